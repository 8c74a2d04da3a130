//! UI layer errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::ValueObjectError,
    infrastructure::dto::http::ErrorResponseDto,
    usecase::{ConnectError, SendMessageError},
};

/// Errors returned by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorResponseDto {
            success: false,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<ConnectError> for ApiError {
    fn from(error: ConnectError) -> Self {
        match error {
            ConnectError::ConnectionLimitExceeded { .. } => Self::Conflict(error.to_string()),
            ConnectError::Registry(_) => Self::Internal(error.to_string()),
        }
    }
}

/// Errors raised while handling a client event; reported back as an `ERROR` event
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ValueObjectError),

    #[error(transparent)]
    SendMessage(#[from] SendMessageError),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CORS origin: {0}")]
    InvalidOrigin(String),
}
