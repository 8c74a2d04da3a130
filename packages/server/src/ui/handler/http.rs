//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    domain::ChatId,
    infrastructure::dto::http::{ChatMessagesDto, MessageDto, OnlineUsersDto},
    ui::{error::ApiError, state::AppState},
};

/// Greeting at the root path
pub async fn root() -> &'static str {
    "Irori Chat Server"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current online users and open socket count
pub async fn online_users(State(state): State<Arc<AppState>>) -> Json<OnlineUsersDto> {
    let users = state
        .sessions
        .online_users()
        .await
        .into_iter()
        .map(|id| id.into_string())
        .collect();

    Json(OnlineUsersDto {
        users,
        connections: state.sessions.count_sockets().await,
    })
}

/// Stored history of a chat
pub async fn chat_messages(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatMessagesDto>, ApiError> {
    let chat_id = ChatId::try_from(chat_id)?;

    let messages = state
        .messages
        .find_by_chat(&chat_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ChatMessagesDto {
        chat_id: chat_id.as_str().to_string(),
        messages: messages.iter().map(MessageDto::from).collect(),
    }))
}
