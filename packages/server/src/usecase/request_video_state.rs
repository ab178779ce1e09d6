//! UseCase: 再生状態の問い合わせ
//!
//! 問い合わせた接続にのみ、Room の現在の再生状態を返します。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, PlaybackState, RoomId, RoomRepository,
};

use super::{DispatchLock, error::RequestVideoStateError};

pub struct RequestVideoStateUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    dispatch_lock: DispatchLock,
}

impl RequestVideoStateUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        dispatch_lock: DispatchLock,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            dispatch_lock,
        }
    }

    pub async fn execute(
        &self,
        requester: &ConnectionId,
        room_id: RoomId,
    ) -> Result<PlaybackState, RequestVideoStateError> {
        let _guard = self.dispatch_lock.lock().await;

        let state = self
            .repository
            .get_state(&room_id)
            .await
            .map_err(|_| RequestVideoStateError::RoomNotFound(room_id.as_str().to_string()))?;

        self.message_pusher
            .push_to(requester, &Notification::VideoState(state.clone()))
            .await
            .map_err(|e| RequestVideoStateError::PushFailed(e.to_string()))?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::VideoAction,
        domain::OpaquePayload,
        usecase::{
            VideoControlUseCase,
            test_support::{Harness, drain, room_id},
        },
    };
    use serde_json::json;

    fn usecase(harness: &Harness) -> RequestVideoStateUseCase {
        RequestVideoStateUseCase::new(
            harness.repository.clone(),
            harness.message_pusher.clone(),
            harness.dispatch_lock.clone(),
        )
    }

    #[tokio::test]
    async fn test_state_is_sent_to_requester_only() {
        // テスト項目: 再生状態は問い合わせた接続にのみ送られる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect_and_join("c-alice", "r1", "alice").await;
        let (bob, mut bob_rx) = harness.connect_and_join("c-bob", "r1", "bob").await;
        drain(&mut alice_rx);
        VideoControlUseCase::new(
            harness.repository.clone(),
            harness.message_pusher.clone(),
            harness.dispatch_lock.clone(),
        )
        .execute(
            &alice,
            room_id("r1"),
            VideoAction::Load,
            OpaquePayload::new(json!({"mediaId": "abc123"})),
        )
        .await
        .unwrap();
        drain(&mut bob_rx);

        // when (操作):
        let state = usecase(&harness).execute(&bob, room_id("r1")).await.unwrap();

        // then (期待する結果):
        assert_eq!(state.media_id.map(|m| m.into_string()), Some("abc123".to_string()));
        assert_eq!(
            drain(&mut bob_rx),
            vec![json!({
                "event": "videoStateResponse",
                "data": {"mediaId": "abc123", "position": 0.0, "isPlaying": false}
            })]
        );
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_room_is_ignored() {
        // テスト項目: 存在しない Room の問い合わせには何も返さない
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx) = harness.connect("c-alice").await;

        // when (操作):
        let result = usecase(&harness).execute(&alice, room_id("ghost")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RequestVideoStateError::RoomNotFound("ghost".to_string()))
        );
        assert!(drain(&mut rx).is_empty());
    }
}
