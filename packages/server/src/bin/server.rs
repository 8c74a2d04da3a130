//! Irori chat relay server.
//!
//! Relays chat messages, typing indicators and online presence between
//! WebSocket clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin irori-server -- --port 8000
//! ```

use clap::Parser;
use irori_server::ServerConfig;
use irori_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = irori_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
