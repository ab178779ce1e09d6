//! WebSocket connection handlers.
//!
//! Each connection gets a server-generated id, an outbound channel drained by
//! a pusher task, and a receive loop that dispatches inbound events one at a
//! time. Malformed input is logged and dropped; nothing is ever answered with
//! an error on the wire.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, DisplayName, OpaquePayload, RoomId},
    infrastructure::dto::websocket::{
        ClientEvent, CursorMoveRequest, JoinRoomRequest, RoomRequest, VideoControlRequest,
    },
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionIdFactory::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// The task ends when the channel is closed (connection unregistered) or the
/// socket rejects a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_client_usecase
        .execute(connection_id.clone(), tx)
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state_clone, &connection_id_clone, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Some(removed) if removed.room_deleted => tracing::info!(
            "'{}' ({}) left room '{}', room deleted",
            removed.participant.display_name,
            connection_id,
            removed.room_id
        ),
        Some(removed) => tracing::info!(
            "'{}' ({}) left room '{}'",
            removed.participant.display_name,
            connection_id,
            removed.room_id
        ),
        None => tracing::info!("Connection '{}' closed before joining a room", connection_id),
    }
}

/// Parse one text frame and dispatch it to the matching use case.
async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Ignoring unparseable frame from '{}': {}", connection_id, e);
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom(request) => handle_join_room(state, connection_id, request).await,
        ClientEvent::VideoControl(request) => {
            handle_video_control(state, connection_id, request).await
        }
        ClientEvent::RequestVideoState(request) => {
            handle_request_video_state(state, connection_id, request).await
        }
        ClientEvent::CursorMove(request) => handle_cursor_move(state, connection_id, request).await,
    }
}

async fn handle_join_room(state: &AppState, connection_id: &ConnectionId, request: JoinRoomRequest) {
    let room_id = request.room_id.and_then(|id| RoomId::new(id).ok());
    let display_name = request.display_name.and_then(|n| DisplayName::new(n).ok());
    let (Some(room_id), Some(display_name)) = (room_id, display_name) else {
        tracing::warn!("Ignoring malformed joinRoom from '{}'", connection_id);
        return;
    };

    let name = display_name.clone();
    match state
        .join_room_usecase
        .execute(connection_id.clone(), room_id.clone(), display_name)
        .await
    {
        Ok(outcome) => tracing::info!(
            "'{}' ({}) joined room '{}' ({} participants)",
            name,
            connection_id,
            room_id,
            outcome.participants.len()
        ),
        Err(e) => tracing::warn!("Ignoring joinRoom from '{}': {}", connection_id, e),
    }
}

async fn handle_video_control(
    state: &AppState,
    connection_id: &ConnectionId,
    request: VideoControlRequest,
) {
    let Ok(room_id) = RoomId::new(request.room_id) else {
        return;
    };

    match state
        .video_control_usecase
        .execute(
            connection_id,
            room_id,
            request.action.into(),
            OpaquePayload::new(request.payload),
        )
        .await
    {
        Ok(targets) => tracing::debug!(
            "Relayed '{:?}' from '{}' to {} connection(s)",
            request.action,
            connection_id,
            targets.len()
        ),
        Err(e) => tracing::debug!("Ignoring videoControl from '{}': {}", connection_id, e),
    }
}

async fn handle_request_video_state(
    state: &AppState,
    connection_id: &ConnectionId,
    request: RoomRequest,
) {
    let Ok(room_id) = RoomId::new(request.room_id) else {
        return;
    };

    if let Err(e) = state
        .request_video_state_usecase
        .execute(connection_id, room_id)
        .await
    {
        tracing::debug!("Ignoring requestVideoState from '{}': {}", connection_id, e);
    }
}

async fn handle_cursor_move(
    state: &AppState,
    connection_id: &ConnectionId,
    request: CursorMoveRequest,
) {
    let Ok(room_id) = RoomId::new(request.room_id) else {
        return;
    };

    if let Err(e) = state
        .cursor_move_usecase
        .execute(connection_id, room_id, OpaquePayload::new(request.position_data))
        .await
    {
        tracing::debug!("Ignoring cursorMove from '{}': {}", connection_id, e);
    }
}
