//! Core domain models for the chat relay.

use serde::{Deserialize, Serialize};

use super::value_object::{ChatId, MessageContent, MessageId, SocketId, Timestamp, UserId, UserName};

/// Default maximum number of stored messages per chat
pub const DEFAULT_MESSAGE_CAPACITY: usize = 1_000;

/// Default maximum number of chats with stored history
pub const DEFAULT_MAX_CHATS: usize = 10_000;

/// Default maximum number of concurrent sockets per user
pub const DEFAULT_MAX_CONNECTIONS_PER_USER: usize = 5;

/// A chat user as seen by the relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: UserId,
    /// Display name
    pub name: UserName,
}

impl User {
    /// Create a new user
    pub fn new(id: UserId, name: UserName) -> Self {
        Self { id, name }
    }
}

/// One live WebSocket connection of a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Connection identifier
    pub socket_id: SocketId,
    /// Owner of the connection
    pub user: User,
    /// Timestamp when the socket connected
    pub connected_at: Timestamp,
}

impl Session {
    /// Create a new session
    pub fn new(socket_id: SocketId, user: User, connected_at: Timestamp) -> Self {
        Self {
            socket_id,
            user,
            connected_at,
        }
    }
}

/// A chat message as stored and relayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message identifier
    pub id: MessageId,
    /// Chat the message belongs to
    pub chat: ChatId,
    /// Sender of the message
    pub sender: User,
    /// Message content
    pub content: MessageContent,
    /// Timestamp when the message was created
    pub created_at: Timestamp,
}

impl Message {
    /// Create a new chat message
    pub fn new(
        id: MessageId,
        chat: ChatId,
        sender: User,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            chat,
            sender,
            content,
            created_at,
        }
    }

    /// Whether the message was sent by the given user
    pub fn is_from(&self, user_id: &UserId) -> bool {
        &self.sender.id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::{MessageIdFactory, SocketIdFactory};

    fn user(id: &str) -> User {
        User::new(
            UserId::new(id.to_string()).unwrap(),
            UserName::new(id.to_uppercase()).unwrap(),
        )
    }

    #[test]
    fn test_message_is_from() {
        // テスト項目: メッセージの送信者を判定できる
        // given (前提条件):
        let message = Message::new(
            MessageIdFactory::generate(),
            ChatId::new("chat-1".to_string()).unwrap(),
            user("alice"),
            MessageContent::new("Hello!".to_string()).unwrap(),
            Timestamp::new(1000),
        );

        // then (期待する結果):
        assert!(message.is_from(&UserId::new("alice".to_string()).unwrap()));
        assert!(!message.is_from(&UserId::new("bob".to_string()).unwrap()));
    }

    #[test]
    fn test_session_new() {
        // テスト項目: セッションは接続 ID・ユーザー・接続時刻を保持する
        // given (前提条件):
        let socket_id = SocketIdFactory::generate();

        // when (操作):
        let session = Session::new(socket_id, user("alice"), Timestamp::new(42));

        // then (期待する結果):
        assert_eq!(session.socket_id, socket_id);
        assert_eq!(session.user.id.as_str(), "alice");
        assert_eq!(session.user.name.as_str(), "ALICE");
        assert_eq!(session.connected_at, Timestamp::new(42));
    }
}
