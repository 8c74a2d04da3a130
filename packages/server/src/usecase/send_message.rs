//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージの保存と配信対象（メンバーの全ソケット）の選定
//!
//! ### なぜこのテストが必要か
//! - 保存に失敗したメッセージが誰にも配信されないことを保証
//! - 送信者自身が members に含まれる場合は送信者の全タブにも配信される
//! - 接続していないメンバーは配信対象から外れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ保存と配信
//! - 異常系：ストレージ障害
//! - 上限：保存件数の上限に達したチャット（古いメッセージを破棄して送信を継続）
//! - エッジケース：全メンバーが未接続（配信対象なし）

use std::sync::Arc;

use crate::domain::{
    ChatId, Message, MessageContent, MessageIdFactory, MessageRepository, SessionRepository,
    SocketId, Timestamp, User, UserId,
};

use super::error::SendMessageError;

/// 保存済みメッセージと配信先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDelivery {
    pub message: Message,
    /// NEW_MESSAGE と NEW_MESSAGE_ALERT を送るソケット
    pub targets: Vec<SocketId>,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    sessions: Arc<dyn SessionRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self { sessions, messages }
    }

    /// メッセージ送信を実行
    ///
    /// 保存に成功した場合のみ配信対象を返します。
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者（接続中のユーザー）
    /// * `chat_id` - 送信先チャット
    /// * `members` - チャットのメンバー
    /// * `content` - メッセージ内容
    ///
    /// # Returns
    ///
    /// * `Ok(MessageDelivery)` - 保存されたメッセージと配信先ソケット
    /// * `Err(SendMessageError)` - 保存失敗
    pub async fn execute(
        &self,
        sender: User,
        chat_id: ChatId,
        members: &[UserId],
        content: MessageContent,
    ) -> Result<MessageDelivery, SendMessageError> {
        let message = Message::new(
            MessageIdFactory::generate(),
            chat_id,
            sender,
            content,
            Timestamp::now(),
        );

        // 1. Repository 経由でメッセージを保存
        self.messages.save(message.clone()).await?;

        // 2. 配信対象を取得（メンバーの全ソケット）
        let targets = self.sessions.sockets_of(members).await;

        Ok(MessageDelivery { message, targets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            RepositoryError, Session, SocketIdFactory, UserName,
            repository::MockMessageRepository,
        },
        infrastructure::repository::{InMemoryMessageRepository, InMemorySessionRepository},
    };
    use tokio::sync::mpsc;

    fn user(id: &str) -> User {
        User::new(
            UserId::new(id.to_string()).unwrap(),
            UserName::new(id.to_string()).unwrap(),
        )
    }

    fn chat() -> ChatId {
        ChatId::new("chat-1".to_string()).unwrap()
    }

    fn content(text: &str) -> MessageContent {
        MessageContent::new(text.to_string()).unwrap()
    }

    async fn connect(sessions: &InMemorySessionRepository, id: &str) -> Session {
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = Session::new(SocketIdFactory::generate(), user(id), Timestamp::now());
        sessions.register(session.clone(), tx).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: メッセージが保存され、メンバーの全ソケットが配信対象になる
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::new(5));
        let messages = Arc::new(InMemoryMessageRepository::new(100, 100));
        let usecase = SendMessageUseCase::new(sessions.clone(), messages.clone());

        let alice = connect(&sessions, "alice").await;
        let bob_tab1 = connect(&sessions, "bob").await;
        let bob_tab2 = connect(&sessions, "bob").await;
        let charlie = connect(&sessions, "charlie").await;

        // when (操作): alice が alice・bob 宛てに送信
        let members = vec![alice.user.id.clone(), bob_tab1.user.id.clone()];
        let delivery = usecase
            .execute(alice.user.clone(), chat(), &members, content("Hello!"))
            .await
            .unwrap();

        // then (期待する結果):
        // 送信者自身と bob の 2 タブが配信対象、charlie は対象外
        assert_eq!(
            delivery.targets,
            vec![alice.socket_id, bob_tab1.socket_id, bob_tab2.socket_id]
        );
        assert!(!delivery.targets.contains(&charlie.socket_id));

        // メッセージが保存されている
        let stored = messages.find_by_chat(&chat()).await.unwrap();
        assert_eq!(stored, vec![delivery.message.clone()]);
        assert!(delivery.message.is_from(&alice.user.id));
        assert_eq!(delivery.message.content.as_str(), "Hello!");
    }

    #[tokio::test]
    async fn test_send_message_no_connected_members() {
        // テスト項目: 全メンバーが未接続の場合、配信対象は空だが保存はされる
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::new(5));
        let messages = Arc::new(InMemoryMessageRepository::new(100, 100));
        let usecase = SendMessageUseCase::new(sessions.clone(), messages.clone());

        // when (操作):
        let members = vec![UserId::new("bob".to_string()).unwrap()];
        let delivery = usecase
            .execute(user("alice"), chat(), &members, content("anyone?"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(delivery.targets.is_empty());
        assert_eq!(messages.count().await, 1);
    }

    #[tokio::test]
    async fn test_send_message_to_full_chat_is_delivered() {
        // テスト項目: 保存件数の上限に達したチャットでも送信でき、古いメッセージが破棄される
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::new(5));
        let alice = connect(&sessions, "alice").await;
        let messages = Arc::new(InMemoryMessageRepository::new(1, 100));
        let usecase = SendMessageUseCase::new(sessions.clone(), messages.clone());
        let members = vec![alice.user.id.clone()];
        usecase
            .execute(alice.user.clone(), chat(), &members, content("1"))
            .await
            .unwrap();

        // when (操作):
        let delivery = usecase
            .execute(alice.user.clone(), chat(), &members, content("2"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(delivery.targets, vec![alice.socket_id]);
        let stored = messages.find_by_chat(&chat()).await.unwrap();
        assert_eq!(stored, vec![delivery.message]);
    }

    #[tokio::test]
    async fn test_send_message_storage_failure_is_reported() {
        // テスト項目: ストレージ障害はエラーとして返され、配信対象は計算されない
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::new(5));
        let alice = connect(&sessions, "alice").await;

        let mut messages = MockMessageRepository::new();
        messages
            .expect_save()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("connection reset".to_string())));
        let usecase = SendMessageUseCase::new(sessions.clone(), Arc::new(messages));

        // when (操作):
        let result = usecase
            .execute(
                alice.user.clone(),
                chat(),
                &[alice.user.id.clone()],
                content("lost?"),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SendMessageError::Persistence(
                "Storage error: connection reset".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_send_message_saves_what_is_delivered() {
        // テスト項目: 保存されるメッセージと配信されるメッセージは同一（同じ ID）
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::new(5));
        let mut messages = MockMessageRepository::new();
        messages
            .expect_save()
            .withf(|message: &Message| message.content.as_str() == "same")
            .times(1)
            .returning(|_| Ok(()));
        let usecase = SendMessageUseCase::new(sessions, Arc::new(messages));

        // when (操作):
        let delivery = usecase
            .execute(user("alice"), chat(), &[], content("same"))
            .await;

        // then (期待する結果):
        assert!(delivery.is_ok());
    }
}
