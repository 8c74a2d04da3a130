//! Domain layer for the chat relay.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{
    DEFAULT_MAX_CHATS, DEFAULT_MAX_CONNECTIONS_PER_USER, DEFAULT_MESSAGE_CAPACITY, Message, Session, User,
};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::{MessageIdFactory, SocketIdFactory};
pub use repository::{MessageRepository, SessionRepository};
pub use value_object::{
    ChatId, MessageContent, MessageId, SocketId, Timestamp, UserId, UserName, parse_members,
};
