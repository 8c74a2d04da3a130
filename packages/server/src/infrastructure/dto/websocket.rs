//! WebSocket event DTOs for the chat relay.
//!
//! Frames are JSON objects of the form `{"event": "NEW_MESSAGE", "data": {...}}`.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatId, Message, UserId};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientEvent {
    NewMessage(NewMessagePayload),
    StartTyping(TypingPayload),
    StopTyping(TypingPayload),
    ChatJoined(ChatPresencePayload),
    ChatLeaved(ChatPresencePayload),
}

impl ClientEvent {
    /// Wire name of the event, used when reporting errors back to the client
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "NEW_MESSAGE",
            Self::StartTyping(_) => "START_TYPING",
            Self::StopTyping(_) => "STOP_TYPING",
            Self::ChatJoined(_) => "CHAT_JOINED",
            Self::ChatLeaved(_) => "CHAT_LEAVED",
        }
    }
}

/// Payload of a client `NEW_MESSAGE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessagePayload {
    pub chat_id: String,
    pub members: Vec<String>,
    pub message: String,
}

/// Payload of `START_TYPING` / `STOP_TYPING`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub members: Vec<String>,
    pub chat_id: String,
}

/// Payload of `CHAT_JOINED` / `CHAT_LEAVED`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPresencePayload {
    #[serde(default)]
    pub user_id: Option<String>,
    pub members: Vec<String>,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerEvent {
    NewMessage(NewMessageEvent),
    NewMessageAlert(ChatRef),
    StartTyping(ChatRef),
    StopTyping(ChatRef),
    OnlineUsers(Vec<String>),
    Error(ErrorEvent),
}

impl ServerEvent {
    /// Serialize into a text frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn online_users(users: &[UserId]) -> Self {
        Self::OnlineUsers(users.iter().map(|id| id.as_str().to_string()).collect())
    }

    pub fn error(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(ErrorEvent {
            event: event.into(),
            message: message.into(),
        })
    }
}

/// `{ chatId }` body shared by alerts and typing notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRef {
    pub chat_id: String,
}

impl From<&ChatId> for ChatRef {
    fn from(chat_id: &ChatId) -> Self {
        Self {
            chat_id: chat_id.as_str().to_string(),
        }
    }
}

/// Body of a server `NEW_MESSAGE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageEvent {
    pub chat_id: String,
    pub message: RealtimeMessage,
}

/// Message as delivered to connected members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeMessage {
    pub content: String,
    #[serde(rename = "_id")]
    pub id: String,
    pub sender: SenderInfo,
    pub chat: String,
    /// RFC 3339, UTC
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

impl From<&Message> for RealtimeMessage {
    fn from(message: &Message) -> Self {
        Self {
            content: message.content.as_str().to_string(),
            id: message.id.to_string(),
            sender: SenderInfo {
                id: message.sender.id.as_str().to_string(),
                name: message.sender.name.as_str().to_string(),
            },
            chat: message.chat.as_str().to_string(),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

impl From<&Message> for NewMessageEvent {
    fn from(message: &Message) -> Self {
        Self {
            chat_id: message.chat.as_str().to_string(),
            message: RealtimeMessage::from(message),
        }
    }
}

/// Error reported back to the socket that sent a rejected event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Name of the event that failed, or `UNKNOWN` for unparseable frames
    pub event: String,
    pub message: String,
}
