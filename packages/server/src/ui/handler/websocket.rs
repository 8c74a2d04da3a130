//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ChatId, MessageContent, Session, SocketId, User, UserId, UserName, parse_members},
    infrastructure::dto::websocket::{
        ChatPresencePayload, ChatRef, ClientEvent, NewMessageEvent, ServerEvent, TypingPayload,
    },
    ui::{
        error::{ApiError, EventError},
        state::{AppState, ConnectQuery},
    },
    usecase::{
        ConnectUserUseCase, DisconnectUserUseCase, NotifyTypingUseCase, SendMessageUseCase,
        UpdatePresenceUseCase,
    },
};

/// Largest accepted WebSocket frame and message, in bytes; larger ones close the socket
const MAX_MESSAGE_SIZE: usize = 64 * 1024;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, ApiError> {
    // Convert String -> Domain Models
    let user_id = UserId::try_from(query.user_id).inspect_err(|e| {
        tracing::warn!("Rejecting connection with invalid user_id: {}", e);
    })?;
    let name = UserName::try_from(query.name).inspect_err(|e| {
        tracing::warn!("Rejecting connection with invalid name: {}", e);
    })?;

    // Create a channel for this socket to receive frames
    let (tx, rx) = mpsc::unbounded_channel();

    // Register before upgrading so the socket is reachable as soon as the handshake completes
    let session = ConnectUserUseCase::new(state.sessions.clone())
        .execute(User::new(user_id, name), tx)
        .await
        .inspect_err(|e| tracing::warn!("Rejecting connection: {}", e))?;

    tracing::info!(
        "User '{}' connected on socket '{}'",
        session.user.id,
        session.socket_id
    );

    Ok(ws
        .max_frame_size(MAX_MESSAGE_SIZE)
        .max_message_size(MAX_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_socket(socket, state, session, rx)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: Session,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let socket_id = session.socket_id;

    let state_clone = state.clone();

    // Spawn a task to receive events from this socket
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", session.socket_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", session.user.id, text.as_str());
                    handle_text(&state_clone, &session, text.as_str()).await;
                }
                Message::Binary(_) => {
                    reply(
                        &state_clone,
                        &session.socket_id,
                        ServerEvent::error("UNKNOWN", "Binary frames are not supported"),
                    )
                    .await;
                }
                Message::Close(_) => {
                    tracing::info!("Socket '{}' requested close", session.socket_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to forward queued frames to this socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let outcome = match DisconnectUserUseCase::new(state.sessions.clone())
        .execute(&socket_id)
        .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("Failed to disconnect socket '{}': {}", socket_id, e);
            return;
        }
    };

    tracing::info!(
        "User '{}' disconnected from socket '{}'",
        outcome.session.user.id,
        socket_id
    );

    if outcome.last_connection {
        let event = ServerEvent::online_users(&outcome.online_users);
        if let Err(e) = deliver(&state, &outcome.notify_targets, &event).await {
            tracing::error!("Failed to broadcast online users: {}", e);
        }
    }
}

/// Parse and dispatch one text frame, reporting failures to the sending socket
async fn handle_text(state: &AppState, session: &Session, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Failed to parse event from '{}': {}", session.user.id, e);
            let error = ServerEvent::error("UNKNOWN", format!("Invalid event: {e}"));
            reply(state, &session.socket_id, error).await;
            return;
        }
    };

    let name = event.name();
    if let Err(e) = dispatch(state, session, event).await {
        tracing::warn!("{} from '{}' failed: {}", name, session.user.id, e);
        reply(state, &session.socket_id, ServerEvent::error(name, e.to_string())).await;
    }
}

async fn dispatch(state: &AppState, session: &Session, event: ClientEvent) -> Result<(), EventError> {
    match event {
        ClientEvent::NewMessage(payload) => {
            let chat_id = ChatId::try_from(payload.chat_id)?;
            let members = parse_members(payload.members)?;
            let content = MessageContent::try_from(payload.message)?;

            let delivery = SendMessageUseCase::new(state.sessions.clone(), state.messages.clone())
                .execute(session.user.clone(), chat_id, &members, content)
                .await?;

            let message_event = ServerEvent::NewMessage(NewMessageEvent::from(&delivery.message));
            let alert = ServerEvent::NewMessageAlert(ChatRef::from(&delivery.message.chat));
            deliver(state, &delivery.targets, &message_event).await?;
            deliver(state, &delivery.targets, &alert).await?;
        }
        ClientEvent::StartTyping(payload) => {
            relay_typing(state, session, payload, ServerEvent::StartTyping).await?;
        }
        ClientEvent::StopTyping(payload) => {
            relay_typing(state, session, payload, ServerEvent::StopTyping).await?;
        }
        ClientEvent::ChatJoined(payload) => {
            let members = presence_members(session, payload)?;
            let broadcast = UpdatePresenceUseCase::new(state.sessions.clone())
                .join(&session.user.id, &members)
                .await;
            let event = ServerEvent::online_users(&broadcast.online_users);
            deliver(state, &broadcast.targets, &event).await?;
        }
        ClientEvent::ChatLeaved(payload) => {
            let members = presence_members(session, payload)?;
            let broadcast = UpdatePresenceUseCase::new(state.sessions.clone())
                .leave(&session.user.id, &members)
                .await;
            let event = ServerEvent::online_users(&broadcast.online_users);
            deliver(state, &broadcast.targets, &event).await?;
        }
    }
    Ok(())
}

async fn relay_typing(
    state: &AppState,
    session: &Session,
    payload: TypingPayload,
    to_event: fn(ChatRef) -> ServerEvent,
) -> Result<(), EventError> {
    let chat_id = ChatId::try_from(payload.chat_id)?;
    let members = parse_members(payload.members)?;

    let targets = NotifyTypingUseCase::new(state.sessions.clone())
        .execute(&session.socket_id, &members)
        .await;

    deliver(state, &targets, &to_event(ChatRef::from(&chat_id))).await
}

/// The acting user is always the connection's user
fn presence_members(
    session: &Session,
    payload: ChatPresencePayload,
) -> Result<Vec<UserId>, EventError> {
    if let Some(claimed) = payload.user_id.as_deref()
        && claimed != session.user.id.as_str()
    {
        tracing::warn!(
            "Ignoring userId '{}' claimed by socket of '{}'",
            claimed,
            session.user.id
        );
    }
    Ok(parse_members(payload.members)?)
}

async fn deliver(
    state: &AppState,
    targets: &[SocketId],
    event: &ServerEvent,
) -> Result<(), EventError> {
    if targets.is_empty() {
        return Ok(());
    }
    let frame = event.to_frame()?;
    let queued = state.sessions.send_to(targets, &frame).await;
    tracing::debug!("Queued frame for {}/{} sockets", queued, targets.len());
    Ok(())
}

async fn reply(state: &AppState, socket_id: &SocketId, event: ServerEvent) {
    if let Err(e) = deliver(state, std::slice::from_ref(socket_id), &event).await {
        tracing::error!("Failed to reply to socket '{}': {}", socket_id, e);
    }
}
