//! UseCase: ソケット切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//! - ソケットの削除と、最後のソケットが閉じた時のオフライン化
//!
//! ### なぜこのテストが必要か
//! - 複数タブのうち 1 つを閉じただけでオフライン扱いにならないことを保証
//! - 最後のソケットが閉じた時に残りの全ソケットへ通知されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：最後のソケットの切断（通知あり）
//! - 正常系：他のタブが残っている場合（通知なし）
//! - 異常系：存在しないソケットの切断試行

use std::sync::Arc;

use crate::domain::{Session, SessionRepository, SocketId, UserId};

use super::error::DisconnectError;

/// 切断処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// 削除されたセッション
    pub session: Session,
    /// ユーザーの最後のソケットだったか
    pub last_connection: bool,
    /// 切断後のオンラインユーザー（ソート済み）
    pub online_users: Vec<UserId>,
    /// ONLINE_USERS を通知するソケット（最後のソケットでなければ空）
    pub notify_targets: Vec<SocketId>,
}

/// ソケット切断のユースケース
pub struct DisconnectUserUseCase {
    /// Repository（データアクセス層の抽象化）
    sessions: Arc<dyn SessionRepository>,
}

impl DisconnectUserUseCase {
    /// 新しい DisconnectUserUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// ソケット切断を実行
    ///
    /// # Arguments
    ///
    /// * `socket_id` - 切断したソケットの ID
    ///
    /// # Returns
    ///
    /// * `Ok(DisconnectOutcome)` - 切断結果と通知対象
    /// * `Err(DisconnectError)` - 登録されていないソケット
    pub async fn execute(&self, socket_id: &SocketId) -> Result<DisconnectOutcome, DisconnectError> {
        // 1. Repository からソケットを削除
        let session = self
            .sessions
            .unregister(socket_id)
            .await
            .map_err(|_| DisconnectError::SessionNotFound(socket_id.to_string()))?;

        // 2. 最後のソケットならオフラインにする
        let last_connection = self.sessions.clear_presence_if_idle(&session.user.id).await;

        // 3. 最後のソケットなら残りの全ソケットに通知
        let notify_targets = if last_connection {
            self.sessions.all_sockets().await
        } else {
            Vec::new()
        };

        Ok(DisconnectOutcome {
            session,
            last_connection,
            online_users: self.sessions.online_users().await,
            notify_targets,
        })
    }
}
