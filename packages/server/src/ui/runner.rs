//! Router construction and server entry point.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

use super::{
    error::ServerError,
    handler::{chat_messages, health_check, online_users, root, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Local development front-ends that are always allowed
const DEV_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:4173"];

/// Request body limit for HTTP endpoints; larger requests get 413
const BODY_LIMIT_BYTES: usize = 16 * 1024;

/// Build the application router.
///
/// # Errors
///
/// Returns `ServerError::InvalidOrigin` if the configured client URL is not a valid header value.
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Result<Router, ServerError> {
    let router = Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/online-users", get(online_users))
        .route("/api/chats/{chat_id}/messages", get(chat_messages))
        .route("/ws", get(websocket_handler))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors_layer(config.client_url.as_deref())?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn cors_layer(client_url: Option<&str>) -> Result<CorsLayer, ServerError> {
    let mut origins: Vec<HeaderValue> = DEV_ORIGINS
        .into_iter()
        .map(HeaderValue::from_static)
        .collect();

    if let Some(url) = client_url {
        let origin = HeaderValue::from_str(url.trim_end_matches('/'))
            .map_err(|_| ServerError::InvalidOrigin(url.to_string()))?;
        origins.push(origin);
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// Run the chat relay until a shutdown signal arrives.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::in_memory(&config));
    let app = create_router(state, &config)?;

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server is running at {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
