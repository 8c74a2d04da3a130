//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{chat_messages, health_check, online_users, root};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
