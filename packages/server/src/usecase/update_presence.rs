//! UseCase: チャット参加・退出によるオンライン状態の更新
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdatePresenceUseCase::join() / leave() メソッド
//! - オンラインユーザー集合の更新と ONLINE_USERS の通知先
//!
//! ### なぜこのテストが必要か
//! - CHAT_JOINED / CHAT_LEAVED のたびにメンバー全員へ最新の一覧が届く必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加・退出
//! - エッジケース：同じユーザーの重複参加、参加していないユーザーの退出

use std::sync::Arc;

use crate::domain::{SessionRepository, SocketId, UserId};

/// ONLINE_USERS の通知内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceBroadcast {
    /// 更新後のオンラインユーザー（ソート済み）
    pub online_users: Vec<UserId>,
    /// 通知先（メンバーの全ソケット）
    pub targets: Vec<SocketId>,
}

/// オンライン状態更新のユースケース
pub struct UpdatePresenceUseCase {
    sessions: Arc<dyn SessionRepository>,
}

impl UpdatePresenceUseCase {
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// CHAT_JOINED: ユーザーをオンラインにする
    pub async fn join(&self, user_id: &UserId, members: &[UserId]) -> PresenceBroadcast {
        if !self.sessions.mark_online(user_id).await {
            tracing::debug!("User '{}' is already online", user_id);
        }
        self.broadcast(members).await
    }

    /// CHAT_LEAVED: ユーザーをオフラインにする
    pub async fn leave(&self, user_id: &UserId, members: &[UserId]) -> PresenceBroadcast {
        if !self.sessions.mark_offline(user_id).await {
            tracing::debug!("User '{}' was not online", user_id);
        }
        self.broadcast(members).await
    }

    async fn broadcast(&self, members: &[UserId]) -> PresenceBroadcast {
        PresenceBroadcast {
            online_users: self.sessions.online_users().await,
            targets: self.sessions.sockets_of(members).await,
        }
    }
}
