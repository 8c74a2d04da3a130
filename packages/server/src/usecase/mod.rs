//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect_user;
pub mod disconnect_user;
pub mod error;
pub mod notify_typing;
pub mod send_message;
pub mod update_presence;

pub use connect_user::ConnectUserUseCase;
pub use disconnect_user::{DisconnectOutcome, DisconnectUserUseCase};
pub use error::{ConnectError, DisconnectError, SendMessageError};
pub use notify_typing::NotifyTypingUseCase;
pub use send_message::{MessageDelivery, SendMessageUseCase};
pub use update_presence::{PresenceBroadcast, UpdatePresenceUseCase};
