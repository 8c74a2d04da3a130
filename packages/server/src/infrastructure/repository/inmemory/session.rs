//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! 接続中のソケット・ユーザー別インデックス・オンラインユーザー集合を
//! 1 つの Mutex で保護し、常に同時に更新します。
//!
//! ## 不変条件
//!
//! - 全てのソケット ID はちょうど 1 人のユーザーに属する
//! - `by_user` に空のエントリは残らない
//! - ソケット表とユーザー別インデックスは同じロックの中で更新される

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{RepositoryError, Session, SessionRepository, SocketId, UserId};

/// 接続中のソケット情報（WebSocket sender を含む）
struct SocketEntry {
    session: Session,
    sender: UnboundedSender<String>,
}

#[derive(Default)]
struct SessionTable {
    sockets: HashMap<SocketId, SocketEntry>,
    /// ユーザーごとのソケット（接続順）
    by_user: HashMap<UserId, Vec<SocketId>>,
    online: BTreeSet<UserId>,
}

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    table: Mutex<SessionTable>,
    /// 1 ユーザーあたりの同時接続数の上限
    max_connections_per_user: usize,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new(max_connections_per_user: usize) -> Self {
        Self {
            table: Mutex::new(SessionTable::default()),
            max_connections_per_user,
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register(
        &self,
        session: Session,
        sender: UnboundedSender<String>,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.lock().await;

        if table.sockets.contains_key(&session.socket_id) {
            return Err(RepositoryError::SessionAlreadyExists(
                session.socket_id.to_string(),
            ));
        }

        let current = table
            .by_user
            .get(&session.user.id)
            .map_or(0, |sockets| sockets.len());
        if current >= self.max_connections_per_user {
            return Err(RepositoryError::ConnectionLimitExceeded {
                user_id: session.user.id.to_string(),
                limit: self.max_connections_per_user,
            });
        }

        table
            .by_user
            .entry(session.user.id.clone())
            .or_default()
            .push(session.socket_id);
        table
            .sockets
            .insert(session.socket_id, SocketEntry { session, sender });

        Ok(())
    }

    async fn unregister(&self, socket_id: &SocketId) -> Result<Session, RepositoryError> {
        let mut table = self.table.lock().await;

        let entry = table
            .sockets
            .remove(socket_id)
            .ok_or_else(|| RepositoryError::SessionNotFound(socket_id.to_string()))?;

        let user_id = &entry.session.user.id;
        let now_empty = match table.by_user.get_mut(user_id) {
            Some(sockets) => {
                sockets.retain(|id| id != socket_id);
                sockets.is_empty()
            }
            None => false,
        };
        if now_empty {
            table.by_user.remove(user_id);
        }

        Ok(entry.session)
    }

    async fn sockets_of(&self, users: &[UserId]) -> Vec<SocketId> {
        let table = self.table.lock().await;
        let mut seen = HashSet::new();
        users
            .iter()
            .filter_map(|user_id| table.by_user.get(user_id))
            .flatten()
            .filter(|socket_id| seen.insert(**socket_id))
            .copied()
            .collect()
    }

    async fn all_sockets(&self) -> Vec<SocketId> {
        let table = self.table.lock().await;
        table.sockets.keys().copied().collect()
    }

    async fn count_sockets(&self) -> usize {
        let table = self.table.lock().await;
        table.sockets.len()
    }

    async fn mark_online(&self, user_id: &UserId) -> bool {
        let mut table = self.table.lock().await;
        table.online.insert(user_id.clone())
    }

    async fn mark_offline(&self, user_id: &UserId) -> bool {
        let mut table = self.table.lock().await;
        table.online.remove(user_id)
    }

    async fn clear_presence_if_idle(&self, user_id: &UserId) -> bool {
        let mut table = self.table.lock().await;
        if table.by_user.contains_key(user_id) {
            return false;
        }
        table.online.remove(user_id);
        true
    }

    async fn online_users(&self) -> Vec<UserId> {
        let table = self.table.lock().await;
        table.online.iter().cloned().collect()
    }

    async fn send_to(&self, targets: &[SocketId], payload: &str) -> usize {
        let table = self.table.lock().await;
        let mut queued = 0;
        for socket_id in targets {
            match table.sockets.get(socket_id) {
                Some(entry) => {
                    if entry.sender.send(payload.to_string()).is_ok() {
                        queued += 1;
                    } else {
                        tracing::warn!(
                            "Failed to queue frame for socket '{}' (user '{}')",
                            socket_id,
                            entry.session.user.id
                        );
                    }
                }
                None => {
                    tracing::debug!("Socket '{}' is no longer registered", socket_id);
                }
            }
        }
        queued
    }
}
