//! Integration tests: a real server on an ephemeral port driven by WebSocket clients.

use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{Mutex, oneshot},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use watchparty_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server},
};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Helper struct to manage an in-process server lifecycle
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let server = Server::new(AppState::new(repository, message_pusher));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(server.serve(listener, async move {
            rx.await.ok();
        }));

        TestServer {
            addr,
            shutdown: Some(tx),
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn connect(&self) -> Ws {
        let (ws, _response) = connect_async(self.ws_url()).await.unwrap();
        ws
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn send(ws: &mut Ws, event: Value) {
    ws.send(Message::text(event.to_string())).await.unwrap();
}

async fn recv(ws: &mut Ws) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

fn join(room: &str, name: &str) -> Value {
    json!({"event": "joinRoom", "data": {"roomId": room, "displayName": name}})
}

fn control(room: &str, action: &str, payload: Value) -> Value {
    json!({"event": "videoControl", "data": {"roomId": room, "action": action, "payload": payload}})
}

fn request_state(room: &str) -> Value {
    json!({"event": "requestVideoState", "data": {"roomId": room}})
}

fn state_response(media_id: Value, position: f64, is_playing: bool) -> Value {
    json!({
        "event": "videoStateResponse",
        "data": {"mediaId": media_id, "position": position, "isPlaying": is_playing}
    })
}

/// Join and consume the three join-time notifications.
async fn join_room(ws: &mut Ws, room: &str, name: &str) -> Vec<Value> {
    send(ws, join(room, name)).await;
    vec![recv(ws).await, recv(ws).await, recv(ws).await]
}

/// Events from one connection are handled in order, so the next message this
/// connection sees after asking for the state is the state response unless
/// something else was queued for it first.
async fn assert_nothing_pending(ws: &mut Ws, room: &str) {
    send(ws, request_state(room)).await;
    let next = recv(ws).await;
    assert_eq!(next["event"], "videoStateResponse", "unexpected message: {next}");
}

#[tokio::test]
async fn test_end_to_end_late_joiner_scenario() {
    // テスト項目: alice の参加 → load → bob の途中参加で状態が揃う
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;

    // when (操作): alice が r1 に参加
    let joined = join_room(&mut alice, "r1", "alice").await;

    // then (期待する結果):
    assert_eq!(
        joined,
        vec![
            json!({"event": "roomExists", "data": true}),
            json!({"event": "participantList", "data": ["alice"]}),
            state_response(Value::Null, 0.0, false),
        ]
    );

    // when (操作): alice が load し、bob が後から参加して状態を問い合わせる
    send(&mut alice, control("r1", "load", json!({"mediaId": "abc123"}))).await;
    send(&mut alice, request_state("r1")).await;
    assert_eq!(
        recv(&mut alice).await,
        state_response(json!("abc123"), 0.0, false)
    );

    let mut bob = server.connect().await;
    let bob_joined = join_room(&mut bob, "r1", "bob").await;
    send(&mut bob, request_state("r1")).await;

    // then (期待する結果):
    assert_eq!(
        bob_joined[1],
        json!({"event": "participantList", "data": ["alice", "bob"]})
    );
    assert_eq!(bob_joined[2], state_response(json!("abc123"), 0.0, false));
    assert_eq!(
        recv(&mut bob).await,
        state_response(json!("abc123"), 0.0, false)
    );
    assert_eq!(
        recv(&mut alice).await,
        json!({"event": "participantList", "data": ["alice", "bob"]})
    );
}

#[tokio::test]
async fn test_late_joiner_sees_playing_state() {
    // テスト項目: load → play の後に参加した接続は再生中の状態を受け取る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    join_room(&mut alice, "r1", "alice").await;
    send(&mut alice, control("r1", "load", json!({"mediaId": "X"}))).await;
    send(&mut alice, control("r1", "play", json!({}))).await;
    assert_nothing_pending(&mut alice, "r1").await;

    // when (操作):
    let mut bob = server.connect().await;
    let joined = join_room(&mut bob, "r1", "bob").await;

    // then (期待する結果):
    assert_eq!(joined[2], state_response(json!("X"), 0.0, true));
}

#[tokio::test]
async fn test_relay_excludes_sender_and_other_rooms() {
    // テスト項目: 中継は送信者と他の Room には届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    let mut carol = server.connect().await;
    join_room(&mut alice, "r1", "alice").await;
    join_room(&mut bob, "r1", "bob").await;
    recv(&mut alice).await; // participantList with bob
    join_room(&mut carol, "r2", "carol").await;

    // when (操作):
    send(&mut bob, control("r1", "seek", json!({"position": 42.5}))).await;
    send(
        &mut bob,
        json!({"event": "cursorMove", "data": {"roomId": "r1", "positionData": {"x": 3, "y": 4}}}),
    )
    .await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut alice).await,
        json!({"event": "videoControl", "data": {"action": "seek", "payload": {"position": 42.5}}})
    );
    assert_eq!(
        recv(&mut alice).await,
        json!({"event": "cursorMove", "data": {"x": 3, "y": 4}})
    );
    assert_nothing_pending(&mut bob, "r1").await;
    assert_nothing_pending(&mut carol, "r2").await;

    send(&mut carol, request_state("r1")).await;
    assert_eq!(recv(&mut carol).await, state_response(Value::Null, 42.5, false));
}

#[tokio::test]
async fn test_malformed_input_is_ignored() {
    // テスト項目: 不正な joinRoom・壊れたフレーム・未知の Room は無視される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;

    // when (操作):
    send(&mut alice, json!({"event": "joinRoom", "data": {"roomId": "r1"}})).await;
    send(&mut alice, json!({"event": "joinRoom", "data": {"roomId": "", "displayName": "alice"}})).await;
    alice.send(Message::text("not json")).await.unwrap();
    send(&mut alice, control("ghost", "play", json!({}))).await;
    send(&mut alice, control("r1", "rewind", json!({}))).await;
    send(&mut alice, request_state("ghost")).await;
    let joined = join_room(&mut alice, "r2", "alice").await;

    // then (期待する結果):
    assert_eq!(joined[0], json!({"event": "roomExists", "data": true}));
    let status = reqwest::get(server.http_url("/api/rooms/r1"))
        .await
        .unwrap()
        .status();
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_disconnect_updates_room_and_deletes_it_when_empty() {
    // テスト項目: 切断で参加者リストが更新され、最後の参加者の切断で Room が消える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = server.connect().await;
    let mut bob = server.connect().await;
    join_room(&mut alice, "r1", "alice").await;
    join_room(&mut bob, "r1", "bob").await;
    recv(&mut alice).await; // participantList with bob

    // when (操作): bob が切断
    bob.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(
        recv(&mut alice).await,
        json!({"event": "participantList", "data": ["alice"]})
    );
    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms[0]["id"], "r1");
    assert_eq!(rooms[0]["participants"], json!(["alice"]));

    // when (操作): alice も切断
    alice.close(None).await.unwrap();

    // then (期待する結果): Room 一覧が空になる
    let mut remaining = Value::Null;
    for _ in 0..50 {
        remaining = reqwest::get(server.http_url("/api/rooms"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if remaining == json!([]) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(remaining, json!([]));
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}
