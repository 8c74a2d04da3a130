//! Logger setup shared by Irori binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise the binary's own target, the server
/// library and `tower_http` are logged at `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // try_init: integration tests may install a subscriber more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    let mut targets = vec![bin_target.as_str(), "irori_server", "tower_http"];
    targets.dedup();
    targets
        .iter()
        .map(|target| format!("{target}={default_level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_normalizes_bin_name() {
        // テスト項目: バイナリ名のハイフンは tracing の target 形式に変換される
        // when (操作):
        let directives = default_directives("irori-server", "debug");

        // then (期待する結果):
        assert_eq!(directives, "irori_server=debug,tower_http=debug");
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_default_directives_other_binary() {
        // テスト項目: サーバ以外のバイナリ名でもライブラリの target が含まれる
        // when (操作):
        let directives = default_directives("irori-bench", "info");

        // then (期待する結果):
        assert_eq!(
            directives,
            "irori_bench=info,irori_server=info,tower_http=info"
        );
    }
}
