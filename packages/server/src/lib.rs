//! Real-time chat relay library.
//!
//! Delivers chat messages, typing indicators and online presence to the
//! WebSocket connections of chat members, and stores sent messages.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::{AppState, create_router, run};
