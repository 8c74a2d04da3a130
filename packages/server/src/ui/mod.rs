//! HTTP and WebSocket surface of the chat relay.

pub mod error;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{create_router, run};
pub use state::AppState;
