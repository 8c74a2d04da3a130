//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use irori_server::{AppState, ServerConfig, create_router};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message},
};

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How long to wait for an expected event
const EVENT_TIMEOUT: Duration = Duration::from_secs(3);

/// How long to wait before concluding that no event arrives
const SILENCE_TIMEOUT: Duration = Duration::from_millis(300);

/// Server running in-process on an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::in_memory(&config));
        let app = create_router(state, &config).expect("Failed to build router");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, user_id: &str, name: &str) -> String {
        format!("ws://{}/ws?user_id={}&name={}", self.addr, user_id, name)
    }

    /// Open a WebSocket as the given user
    pub async fn connect(&self, user_id: &str, name: &str) -> WsClient {
        let (ws, _) = connect_async(self.ws_url(user_id, name))
            .await
            .expect("Failed to connect WebSocket");
        ws
    }

    /// Attempt a connection and return the HTTP status on rejection
    pub async fn connect_status(&self, url: String) -> Option<u16> {
        match connect_async(url).await {
            Ok(_) => None,
            Err(tungstenite::Error::Http(response)) => Some(response.status().as_u16()),
            Err(e) => panic!("Unexpected connection error: {e}"),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Send a client event
pub async fn send_event(ws: &mut WsClient, event: serde_json::Value) {
    ws.send(Message::Text(event.to_string().into()))
        .await
        .expect("Failed to send event");
}

/// Receive the next server event
pub async fn recv_event(ws: &mut WsClient) -> serde_json::Value {
    let next = async {
        while let Some(msg) = ws.next().await {
            match msg.expect("WebSocket error") {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("Invalid JSON event");
                }
                Message::Close(_) => panic!("Socket closed while waiting for an event"),
                _ => continue,
            }
        }
        panic!("Socket ended while waiting for an event");
    };

    tokio::time::timeout(EVENT_TIMEOUT, next)
        .await
        .expect("Timed out waiting for an event")
}

/// Assert that no event arrives for a short while
pub async fn assert_no_event(ws: &mut WsClient) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(SILENCE_TIMEOUT, ws.next()).await {
        panic!("Unexpected event: {}", text.as_str());
    }
}

/// Assert that the server closes the socket
pub async fn assert_closed(ws: &mut WsClient) {
    let closed = async {
        loop {
            match ws.next().await {
                None | Some(Err(_)) | Some(Ok(Message::Close(_))) => return,
                Some(Ok(Message::Text(text))) => panic!("Unexpected event: {}", text.as_str()),
                Some(Ok(_)) => continue,
            }
        }
    };

    tokio::time::timeout(EVENT_TIMEOUT, closed)
        .await
        .expect("Timed out waiting for the socket to close");
}
