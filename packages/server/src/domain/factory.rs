//! Domain factories for creating identifiers.

use super::{MessageId, SocketId};

/// Factory for generating SocketId instances.
///
/// Every accepted WebSocket upgrade gets a fresh random identifier.
pub struct SocketIdFactory;

impl SocketIdFactory {
    /// Generate a new SocketId with a random UUID v4.
    pub fn generate() -> SocketId {
        SocketId::from_uuid(uuid::Uuid::new_v4())
    }
}

/// Factory for generating MessageId instances.
///
/// The same identifier is used for the realtime payload and the stored record.
pub struct MessageIdFactory;

impl MessageIdFactory {
    /// Generate a new MessageId with a random UUID v4.
    pub fn generate() -> MessageId {
        MessageId::from_uuid(uuid::Uuid::new_v4())
    }
}
