//! Server configuration from command-line flags and environment variables.

use clap::Parser;

use crate::domain::{DEFAULT_MAX_CHATS, DEFAULT_MAX_CONNECTIONS_PER_USER, DEFAULT_MESSAGE_CAPACITY};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Irori chat relay server
#[derive(Parser, Clone, Debug)]
#[command(name = "irori-server", version, about = "Real-time chat relay server")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Front-end origin allowed by CORS in addition to the local dev servers
    #[arg(long, env = "CLIENT_URL")]
    pub client_url: Option<String>,

    /// Maximum number of stored messages per chat; older messages are dropped
    #[arg(long, env = "MESSAGE_CAPACITY", default_value_t = DEFAULT_MESSAGE_CAPACITY)]
    pub message_capacity: usize,

    /// Maximum number of chats with stored history; the least recently written chat is dropped
    #[arg(long, env = "MAX_CHATS", default_value_t = DEFAULT_MAX_CHATS)]
    pub max_chats: usize,

    /// Maximum number of concurrent sockets per user
    #[arg(long, env = "MAX_CONNECTIONS_PER_USER", default_value_t = DEFAULT_MAX_CONNECTIONS_PER_USER)]
    pub max_connections_per_user: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            client_url: None,
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
            max_chats: DEFAULT_MAX_CHATS,
            max_connections_per_user: DEFAULT_MAX_CONNECTIONS_PER_USER,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        // テスト項目: コマンドライン引数で設定を上書きできる
        // when (操作):
        let config = ServerConfig::try_parse_from([
            "irori-server",
            "--port",
            "9000",
            "--client-url",
            "https://chat.example.com",
            "--max-connections-per-user",
            "2",
            "--max-chats",
            "50",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(config.port, 9000);
        assert_eq!(config.client_url.as_deref(), Some("https://chat.example.com"));
        assert_eq!(config.max_connections_per_user, 2);
        assert_eq!(config.max_chats, 50);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        // テスト項目: 範囲外のポート番号はエラーになる
        // when (操作):
        let result = ServerConfig::try_parse_from(["irori-server", "--port", "70000"]);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
