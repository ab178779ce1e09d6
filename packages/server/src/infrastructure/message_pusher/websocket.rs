//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - ドメインの `Notification` を JSON（`ServerEvent`）にエンコードして送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。
//! 送信はチャンネルへのキュー投入のみで、ソケットへの書き込みは接続ごとの
//! pusher ループが行います。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    /// 接続中のクライアント数
    pub async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(notification))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(connection_id) {
            sender
                .send(content)
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted message to connection '{}'", target);
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    target
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, OpaquePayload, PlaybackState};
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信と JSON エンコード
    // - broadcast: 複数接続への送信、部分失敗の許容
    // - エラーハンドリング（未登録の接続）
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    fn connection(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn parse(text: Option<String>) -> Value {
        serde_json::from_str(&text.expect("message expected")).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON エンコードされた通知を送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(connection("alice"), tx).await;

        // when (操作):
        let result = pusher
            .push_to(
                &connection("alice"),
                &Notification::VideoState(PlaybackState::default()),
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            parse(rx.recv().await),
            json!({
                "event": "videoStateResponse",
                "data": {"mediaId": null, "position": 0.0, "isPlaying": false}
            })
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 未登録の接続への送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();

        // when (操作):
        let result = pusher
            .push_to(&connection("ghost"), &Notification::RoomExists(true))
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部の接続が存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(connection("alice"), tx1).await;
        pusher.register_client(connection("bob"), tx2).await;

        // when (操作):
        let notification = Notification::CursorMove(OpaquePayload::new(json!({"x": 1, "y": 2})));
        let result = pusher
            .broadcast(
                vec![connection("alice"), connection("ghost"), connection("bob")],
                &notification,
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = json!({"event": "cursorMove", "data": {"x": 1, "y": 2}});
        assert_eq!(parse(rx1.recv().await), expected);
        assert_eq!(parse(rx2.recv().await), expected);
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        // テスト項目: 登録解除後は通知が届かず、チャンネルが閉じる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(connection("alice"), tx).await;

        // when (操作):
        pusher.unregister_client(&connection("alice")).await;
        let notification =
            Notification::ParticipantList(vec![DisplayName::new("bob".to_string()).unwrap()]);
        pusher
            .broadcast(vec![connection("alice")], &notification)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(rx.recv().await, None);
        assert_eq!(pusher.count_clients().await, 0);
    }
}
