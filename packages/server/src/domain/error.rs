//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} bytes (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    #[error("UserName cannot be empty")]
    UserNameEmpty,

    #[error("UserName cannot exceed {max} characters (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    /// ChatId validation error
    #[error("ChatId cannot be empty")]
    ChatIdEmpty,

    #[error("ChatId cannot exceed {max} bytes (got {actual})")]
    ChatIdTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,

    /// MessageContent too long error
    #[error("MessageContent cannot exceed {max} bytes (got {actual})")]
    MessageContentTooLong { max: usize, actual: usize },
}

/// Errors returned by repository implementations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No session is registered under the socket id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The socket id is already registered
    #[error("Session already registered: {0}")]
    SessionAlreadyExists(String),

    /// The user already holds the maximum number of sockets
    #[error("User '{user_id}' already has {limit} active connections")]
    ConnectionLimitExceeded { user_id: String, limit: usize },

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(String),
}
