//! UseCase: 入力中通知の中継
//!
//! START_TYPING / STOP_TYPING はメンバーの全ソケットに中継しますが、
//! イベントを送ってきたソケット自身には返しません（同じユーザーの他のタブには届きます）。

use std::sync::Arc;

use crate::domain::{SessionRepository, SocketId, UserId};

/// 入力中通知のユースケース
pub struct NotifyTypingUseCase {
    sessions: Arc<dyn SessionRepository>,
}

impl NotifyTypingUseCase {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// 通知先のソケットを返す
    ///
    /// # Arguments
    ///
    /// * `origin` - イベントを送ってきたソケット
    /// * `members` - チャットのメンバー
    pub async fn execute(&self, origin: &SocketId, members: &[UserId]) -> Vec<SocketId> {
        self.sessions
            .sockets_of(members)
            .await
            .into_iter()
            .filter(|socket_id| socket_id != origin)
            .collect()
    }
}
