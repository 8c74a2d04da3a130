//! InMemory Message Repository 実装
//!
//! チャットごとのメッセージ履歴を HashMap に保持します。
//! 各チャットは最新 `capacity_per_chat` 件だけを保持し、古いメッセージから破棄します。
//! 保持するチャット数にも上限があり、超えた場合は最後の書き込みが最も古いチャットを破棄します。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ChatId, Message, MessageRepository, RepositoryError};

struct ChatHistory {
    messages: VecDeque<Message>,
    /// 最後に書き込まれた時点の論理時刻
    last_write: u64,
}

#[derive(Default)]
struct MessageStore {
    chats: HashMap<ChatId, ChatHistory>,
    /// 書き込みごとに進む論理時刻
    clock: u64,
}

impl MessageStore {
    /// 最後の書き込みが最も古いチャットを破棄
    fn evict_least_recent(&mut self) {
        let oldest = self
            .chats
            .iter()
            .min_by_key(|(_, history)| history.last_write)
            .map(|(chat_id, _)| chat_id.clone());

        if let Some(chat_id) = oldest
            && let Some(history) = self.chats.remove(&chat_id)
        {
            tracing::debug!(
                "Evicted history of chat '{}' ({} messages)",
                chat_id,
                history.messages.len()
            );
        }
    }
}

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    store: RwLock<MessageStore>,
    /// チャットごとの最大保存件数
    capacity_per_chat: usize,
    /// 保持するチャットの最大数
    max_chats: usize,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    ///
    /// どちらの上限も 1 未満は 1 として扱います。
    pub fn new(capacity_per_chat: usize, max_chats: usize) -> Self {
        Self {
            store: RwLock::new(MessageStore::default()),
            capacity_per_chat: capacity_per_chat.max(1),
            max_chats: max_chats.max(1),
        }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn save(&self, message: Message) -> Result<(), RepositoryError> {
        let mut store = self.store.write().await;
        store.clock += 1;
        let now = store.clock;

        if !store.chats.contains_key(&message.chat) && store.chats.len() >= self.max_chats {
            store.evict_least_recent();
        }

        let history = store
            .chats
            .entry(message.chat.clone())
            .or_insert_with(|| ChatHistory {
                messages: VecDeque::new(),
                last_write: now,
            });
        history.last_write = now;
        history.messages.push_back(message);
        while history.messages.len() > self.capacity_per_chat {
            history.messages.pop_front();
        }
        Ok(())
    }

    async fn find_by_chat(&self, chat_id: &ChatId) -> Result<Vec<Message>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .chats
            .get(chat_id)
            .map(|history| history.messages.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn count(&self) -> usize {
        let store = self.store.read().await;
        store.chats.values().map(|history| history.messages.len()).sum()
    }
}
