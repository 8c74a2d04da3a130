//! Server state and connection parameters.

use serde::Deserialize;
use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::{MessageRepository, SessionRepository},
    infrastructure::repository::{InMemoryMessageRepository, InMemorySessionRepository},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub user_id: String,
    pub name: String,
}

/// Shared application state
pub struct AppState {
    /// Live sockets and online users
    pub sessions: Arc<dyn SessionRepository>,
    /// Message history
    pub messages: Arc<dyn MessageRepository>,
}

impl AppState {
    pub fn new(sessions: Arc<dyn SessionRepository>, messages: Arc<dyn MessageRepository>) -> Self {
        Self { sessions, messages }
    }

    /// State backed by the in-memory repositories
    pub fn in_memory(config: &ServerConfig) -> Self {
        Self::new(
            Arc::new(InMemorySessionRepository::new(
                config.max_connections_per_user,
            )),
            Arc::new(InMemoryMessageRepository::new(
                config.message_capacity,
                config.max_chats,
            )),
        )
    }
}
