//! Repository traits.
//!
//! ドメイン層が必要とするデータアクセスの抽象。
//! 具体的な実装は infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::{Message, Session},
    error::RepositoryError,
    value_object::{ChatId, SocketId, UserId},
};

/// Registry of live sockets and the online-user set.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Register a socket together with its outbound frame channel.
    async fn register(
        &self,
        session: Session,
        sender: UnboundedSender<String>,
    ) -> Result<(), RepositoryError>;

    /// Remove a socket and return its session.
    async fn unregister(&self, socket_id: &SocketId) -> Result<Session, RepositoryError>;

    /// Every socket of the given users, without duplicates.
    async fn sockets_of(&self, users: &[UserId]) -> Vec<SocketId>;

    /// Every registered socket.
    async fn all_sockets(&self) -> Vec<SocketId>;

    /// Number of registered sockets.
    async fn count_sockets(&self) -> usize;

    /// Add the user to the online set. Returns false if already online.
    async fn mark_online(&self, user_id: &UserId) -> bool;

    /// Remove the user from the online set. Returns false if not online.
    async fn mark_offline(&self, user_id: &UserId) -> bool;

    /// Remove the user from the online set if they hold no sockets.
    ///
    /// Returns true when the user has no sockets left. The check and the
    /// removal happen under one lock so a concurrent reconnect is never
    /// marked offline.
    async fn clear_presence_if_idle(&self, user_id: &UserId) -> bool;

    /// Online users, sorted by id.
    async fn online_users(&self) -> Vec<UserId>;

    /// Queue a serialized frame on each target's channel.
    ///
    /// Returns the number of frames queued.
    async fn send_to(&self, targets: &[SocketId], payload: &str) -> usize;
}

/// Persistent message history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a message.
    async fn save(&self, message: Message) -> Result<(), RepositoryError>;

    /// Messages of a chat in insertion order.
    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError>;

    /// Number of stored messages across all chats.
    async fn count(&self) -> usize;
}
