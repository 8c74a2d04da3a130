//! UseCase: ソケット接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUserUseCase::execute() メソッド
//! - ソケットの登録（ソケット ID の採番、同時接続数の制限）
//!
//! ### なぜこのテストが必要か
//! - 1 人のユーザーが複数タブから接続しても、全てのソケットに配信される必要がある
//! - 同時接続数の上限を超えた接続は拒否されることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの接続、同じユーザーの 2 つ目の接続
//! - 異常系：同時接続数の上限超過

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{Session, SessionRepository, SocketIdFactory, Timestamp, User};

use super::error::ConnectError;

/// ソケット接続のユースケース
pub struct ConnectUserUseCase {
    /// Repository（データアクセス層の抽象化）
    sessions: Arc<dyn SessionRepository>,
}

impl ConnectUserUseCase {
    /// 新しい ConnectUserUseCase を作成
    pub fn new(sessions: Arc<dyn SessionRepository>) -> Self {
        Self { sessions }
    }

    /// ソケット接続を実行
    ///
    /// 接続しただけではオンラインにはなりません（CHAT_JOINED で更新）。
    ///
    /// # Arguments
    ///
    /// * `user` - 接続するユーザー（Domain Model）
    /// * `sender` - このソケットへのフレーム送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - 登録されたセッション
    /// * `Err(ConnectError)` - 接続失敗
    pub async fn execute(
        &self,
        user: User,
        sender: UnboundedSender<String>,
    ) -> Result<Session, ConnectError> {
        let session = Session::new(SocketIdFactory::generate(), user, Timestamp::now());
        self.sessions.register(session.clone(), sender).await?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{UserId, UserName},
        infrastructure::repository::InMemorySessionRepository,
    };
    use tokio::sync::mpsc;

    fn user(id: &str) -> User {
        User::new(
            UserId::new(id.to_string()).unwrap(),
            UserName::new(id.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_connect_user_success() {
        // テスト項目: 新規ユーザーが正常に接続できる
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new(5));
        let usecase = ConnectUserUseCase::new(repository.clone());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(user("alice"), tx).await;

        // then (期待する結果):
        let session = result.unwrap();
        assert_eq!(session.user.id.as_str(), "alice");
        assert_eq!(repository.count_sockets().await, 1);
        assert_eq!(
            repository.sockets_of(&[session.user.id.clone()]).await,
            vec![session.socket_id]
        );

        // 接続しただけではオンラインにならない
        assert!(repository.online_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_same_user_twice() {
        // テスト項目: 同じユーザーの 2 つ目の接続は別のソケットとして登録される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new(5));
        let usecase = ConnectUserUseCase::new(repository.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();

        // when (操作):
        let tab1 = usecase.execute(user("alice"), tx1).await.unwrap();
        let tab2 = usecase.execute(user("alice"), tx2).await.unwrap();

        // then (期待する結果):
        assert_ne!(tab1.socket_id, tab2.socket_id);
        let sockets = repository.sockets_of(&[tab1.user.id.clone()]).await;
        assert_eq!(sockets, vec![tab1.socket_id, tab2.socket_id]);
    }

    #[tokio::test]
    async fn test_connect_user_limit_exceeded() {
        // テスト項目: 同時接続数の上限を超えるとエラーが返される
        // given (前提条件):
        let repository = Arc::new(InMemorySessionRepository::new(1));
        let usecase = ConnectUserUseCase::new(repository.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        usecase.execute(user("alice"), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(user("alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::ConnectionLimitExceeded {
                user_id: "alice".to_string(),
                limit: 1
            })
        );
        assert_eq!(repository.count_sockets().await, 1);
    }
}
