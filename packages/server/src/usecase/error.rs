//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RepositoryError;

/// 接続処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// 同時接続数の上限超過
    #[error("User '{user_id}' already has {limit} active connections")]
    ConnectionLimitExceeded { user_id: String, limit: usize },

    /// セッション登録の失敗
    #[error("Failed to register session: {0}")]
    Registry(RepositoryError),
}

impl From<RepositoryError> for ConnectError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ConnectionLimitExceeded { user_id, limit } => {
                Self::ConnectionLimitExceeded { user_id, limit }
            }
            other => Self::Registry(other),
        }
    }
}

/// 切断処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisconnectError {
    /// 登録されていないソケット
    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// メッセージ送信処理のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 保存処理の失敗
    #[error("Failed to store message: {0}")]
    Persistence(String),
}

impl From<RepositoryError> for SendMessageError {
    fn from(error: RepositoryError) -> Self {
        Self::Persistence(error.to_string())
    }
}
