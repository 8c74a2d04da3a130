//! インメモリ Repository 実装

pub mod message;
pub mod session;

pub use message::InMemoryMessageRepository;
pub use session::InMemorySessionRepository;
