//! HTTP API response DTOs for the chat relay.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

/// Presence snapshot for the online-users endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUsersDto {
    pub users: Vec<String>,
    /// Number of open sockets across all users
    pub connections: usize,
}

/// Stored message for the chat history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    /// Sender's user id
    pub sender: String,
    pub chat: String,
    pub created_at: String, // ISO 8601
}

impl From<&Message> for MessageDto {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            content: message.content.as_str().to_string(),
            sender: message.sender.id.as_str().to_string(),
            chat: message.chat.as_str().to_string(),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// Chat history response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessagesDto {
    pub chat_id: String,
    pub messages: Vec<MessageDto>,
}

/// Error body, `{"success": false, "message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub success: bool,
    pub message: String,
}
