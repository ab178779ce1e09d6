//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::json;
use tokio::{
    sync::{Mutex, mpsc},
    task::JoinError,
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};
use watchparty_server::infrastructure::dto::websocket::{
    ClientEvent, CursorMoveRequest, JoinRoomRequest, RoomRequest, ServerEvent,
    VideoControlRequest,
};
use watchparty_shared::time::{Clock, SystemClock};

use crate::{
    command::{Command, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    player::{MediaPlayer, SimulatedPlayer},
    sync::{OutboundControl, SYNC_INTERVAL, SyncReconciler},
    ui::redisplay_prompt,
};

type SharedReconciler = Arc<Mutex<SyncReconciler<SimulatedPlayer>>>;
type EventSender = mpsc::UnboundedSender<ClientEvent>;

/// Run one WebSocket session: join `room` as `name`, keep the local player in
/// sync and execute commands read from `input_rx`.
///
/// Returns `Ok(())` when the input channel closes (the user quit).
pub async fn run_client_session(
    url: &str,
    room: &str,
    name: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to watch-party server!");
    println!(
        "\nYou are '{}' in room '{}'. Type /help for commands. Press Ctrl+C to exit.\n",
        name, room
    );

    let (mut write, mut read) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<ClientEvent>();

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let reconciler: SharedReconciler = Arc::new(Mutex::new(SyncReconciler::new(
        SimulatedPlayer::new(clock.clone()),
        clock.clone(),
    )));

    // The simulated player is ready as soon as it exists, so the state
    // request follows the join directly.
    out_tx
        .send(ClientEvent::JoinRoom(JoinRoomRequest {
            room_id: Some(room.to_string()),
            display_name: Some(name.to_string()),
        }))
        .ok();
    out_tx
        .send(ClientEvent::RequestVideoState(RoomRequest {
            room_id: room.to_string(),
        }))
        .ok();

    // Spawn a task that serializes outbound events onto the socket
    let mut write_task = tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize event: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send event: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
        }
        Ok(())
    });

    // Spawn a task to handle incoming events
    let mut read_task = tokio::spawn(read_loop(
        read,
        reconciler.clone(),
        clock.clone(),
        room.to_string(),
        name.to_string(),
    ));

    // Spawn the position heartbeat
    let heartbeat_task = tokio::spawn({
        let reconciler = reconciler.clone();
        let out_tx = out_tx.clone();
        let room = room.to_string();
        async move {
            let mut interval = tokio::time::interval(SYNC_INTERVAL);
            // The first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let outbound = reconciler.lock().await.heartbeat();
                if let Some(control) = outbound
                    && out_tx.send(control_event(&room, control)).is_err()
                {
                    break;
                }
            }
        }
    });

    let result = loop {
        tokio::select! {
            read_result = &mut read_task => break flatten(read_result),
            write_result = &mut write_task => break flatten(write_result),
            line = input_rx.recv() => match line {
                Some(line) => {
                    let output = match parse_command(&line) {
                        Ok(command) => execute_command(command, &reconciler, &out_tx, room).await,
                        Err(e) => MessageFormatter::format_error(&e.to_string()),
                    };
                    print!("{}", output);
                    redisplay_prompt(name);
                }
                None => break Ok(()),
            },
        }
    };

    read_task.abort();
    write_task.abort();
    heartbeat_task.abort();

    result
}

async fn read_loop<S>(
    mut read: S,
    reconciler: SharedReconciler,
    clock: Arc<dyn Clock>,
    room: String,
    name: String,
) -> Result<(), ClientError>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let output = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                    Ok(event) => {
                        handle_server_event(event, &reconciler, clock.as_ref(), &room, &name)
                            .await?
                    }
                    Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                };
                print!("{}", output);
                redisplay_prompt(&name);
            }
            Ok(Message::Binary(data)) => {
                print!("{}", MessageFormatter::format_binary_message(data.len()));
                redisplay_prompt(&name);
            }
            Ok(Message::Close(_)) => {
                tracing::info!("Server closed the connection");
                return Err(ClientError::ConnectionError(
                    "Server closed the connection".to_string(),
                ));
            }
            Err(e) => {
                tracing::warn!("WebSocket read error: {}", e);
                return Err(ClientError::ConnectionError(e.to_string()));
            }
            _ => {}
        }
    }

    Err(ClientError::ConnectionError("Connection lost".to_string()))
}

fn flatten(result: Result<Result<(), ClientError>, JoinError>) -> Result<(), ClientError> {
    result.unwrap_or_else(|e| Err(ClientError::ConnectionError(e.to_string())))
}

fn control_event(room: &str, control: OutboundControl) -> ClientEvent {
    ClientEvent::VideoControl(VideoControlRequest {
        room_id: room.to_string(),
        action: control.action,
        payload: control.payload,
    })
}

/// Apply one server event and return the text to display
async fn handle_server_event(
    event: ServerEvent,
    reconciler: &SharedReconciler,
    clock: &dyn Clock,
    room: &str,
    name: &str,
) -> Result<String, ClientError> {
    let output = match event {
        ServerEvent::RoomExists(true) => MessageFormatter::format_joined(room),
        ServerEvent::RoomExists(false) => {
            return Err(ClientError::RoomUnavailable(room.to_string()));
        }
        ServerEvent::ParticipantList(names) => MessageFormatter::format_participants(&names, name),
        ServerEvent::VideoStateResponse(state) => {
            reconciler.lock().await.apply_state(&state);
            MessageFormatter::format_room_state(&state)
        }
        ServerEvent::VideoControl(broadcast) => {
            let applied = reconciler
                .lock()
                .await
                .apply_remote(broadcast.action, &broadcast.payload);
            tracing::debug!("Remote '{:?}' applied: {}", broadcast.action, applied);
            MessageFormatter::format_remote_control(
                broadcast.action,
                &broadcast.payload,
                applied,
                clock.now_millis(),
            )
        }
        ServerEvent::CursorMove(position_data) => MessageFormatter::format_cursor(&position_data),
    };
    Ok(output)
}

/// Execute one stdin command and return the text to display
async fn execute_command(
    command: Command,
    reconciler: &SharedReconciler,
    out_tx: &EventSender,
    room: &str,
) -> String {
    let mut reconciler = reconciler.lock().await;

    let outbound: Vec<OutboundControl> = match command {
        Command::Load(media_id) => reconciler.local_load(&media_id),
        Command::Play => reconciler.local_play().into_iter().collect(),
        Command::Pause => reconciler.local_pause().into_iter().collect(),
        Command::Seek(position) => reconciler.local_seek(position).into_iter().collect(),
        Command::Cursor { x, y } => {
            let position_data = json!({ "x": x, "y": y });
            let output = format!("-> cursor {}\n", position_data);
            out_tx
                .send(ClientEvent::CursorMove(CursorMoveRequest {
                    room_id: room.to_string(),
                    position_data,
                }))
                .ok();
            return output;
        }
        Command::State => {
            let player = reconciler.player();
            return MessageFormatter::format_local_state(
                player.media_id(),
                player.current_position(),
                player.status(),
                reconciler.is_suppressed(),
            );
        }
        Command::Help => return MessageFormatter::format_help(),
    };

    if outbound.is_empty() {
        return MessageFormatter::format_error("nothing sent (no media loaded or sync suppressed)");
    }

    let mut output = String::new();
    for control in outbound {
        output.push_str(&MessageFormatter::format_sent(control.action, &control.payload));
        out_tx.send(control_event(room, control)).ok();
    }
    output
}
