//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - Room の遅延作成、参加者の追加、参加時の通知（roomExists / participantList / 再生状態）
//!
//! ### なぜこのテストが必要か
//! - 途中参加者が中間のアクションを再生せずに現在の状態へ追いつけることを保証する
//! - 参加者リストが Room の全員に届くことを確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規 Room への参加、既存 Room への途中参加
//! - 異常系：同じ接続からの二重参加

use std::sync::Arc;

use watchparty_shared::time::current_timestamp_millis;

use crate::domain::{
    ConnectionId, DisplayName, MessagePusher, Notification, Participant, PlaybackState,
    RoomId, RoomRepository, Timestamp,
};

use super::{DispatchLock, error::JoinRoomError};

/// 参加処理の結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// 参加後の表示名一覧（参加順）
    pub participants: Vec<DisplayName>,
    /// 参加者に送った再生状態
    pub state: PlaybackState,
}

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（Room 台帳の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    dispatch_lock: DispatchLock,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
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

    /// 参加を実行
    ///
    /// 1. Room がなければ作成
    /// 2. 参加者を追加
    /// 3. 参加者に `roomExists(true)` を送信
    /// 4. Room の全員に参加者リストを送信
    /// 5. 参加者に現在の再生状態を送信
    ///
    /// # Errors
    ///
    /// * `JoinRoomError::AlreadyJoined` - 接続が既にどこかの Room に参加している
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room_id: RoomId,
        display_name: DisplayName,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let _guard = self.dispatch_lock.lock().await;

        if let Some(current) = self.repository.room_of(&connection_id).await {
            return Err(JoinRoomError::AlreadyJoined(current.into_string()));
        }

        let joined_at = Timestamp::new(current_timestamp_millis());
        self.repository.ensure_room(room_id.clone(), joined_at).await;
        self.repository
            .add_participant(
                &room_id,
                Participant::new(connection_id.clone(), display_name, joined_at),
            )
            .await?;

        self.push(&connection_id, &Notification::RoomExists(true))
            .await;

        let members = self.repository.connection_ids(&room_id).await?;
        let participants = self.repository.participant_names(&room_id).await?;
        if let Err(e) = self
            .message_pusher
            .broadcast(members, &Notification::ParticipantList(participants.clone()))
            .await
        {
            tracing::warn!("Failed to broadcast participant list of '{}': {}", room_id, e);
        }

        let state = self.repository.get_state(&room_id).await?;
        self.push(&connection_id, &Notification::VideoState(state.clone()))
            .await;

        Ok(JoinOutcome {
            participants,
            state,
        })
    }

    async fn push(&self, connection_id: &ConnectionId, notification: &Notification) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, notification)
            .await
        {
            tracing::warn!("Failed to push to '{}': {}", connection_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MediaId, PlaybackCommand},
        usecase::test_support::{Harness, display_name, drain, room_id},
    };
    use serde_json::json;

    #[tokio::test]
    async fn test_first_join_creates_room_and_notifies() {
        // テスト項目: 最初の参加で Room が作成され、3 種類の通知が順に届く
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx) = harness.connect("c-alice").await;
        let usecase = harness.join_usecase();

        // when (操作):
        let outcome = usecase
            .execute(alice, room_id("r1"), display_name("alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.participants, vec![display_name("alice")]);
        assert_eq!(outcome.state, PlaybackState::default());
        assert_eq!(harness.repository.count_rooms().await, 1);
        assert_eq!(
            drain(&mut rx),
            vec![
                json!({"event": "roomExists", "data": true}),
                json!({"event": "participantList", "data": ["alice"]}),
                json!({
                    "event": "videoStateResponse",
                    "data": {"mediaId": null, "position": 0.0, "isPlaying": false}
                }),
            ]
        );
    }

    #[tokio::test]
    async fn test_late_joiner_receives_current_state() {
        // テスト項目: 途中参加者は中間のアクションなしに現在の再生状態を受け取る
        // given (前提条件):
        let harness = Harness::new();
        let (_alice, mut alice_rx) = harness.connect_and_join("c-alice", "r1", "alice").await;
        let media = MediaId::new("X".to_string()).unwrap();
        harness
            .repository
            .apply_action(&room_id("r1"), &PlaybackCommand::Load(Some(media)))
            .await
            .unwrap();
        harness
            .repository
            .apply_action(&room_id("r1"), &PlaybackCommand::Play)
            .await
            .unwrap();
        let (bob, mut bob_rx) = harness.connect("c-bob").await;

        // when (操作):
        let outcome = harness
            .join_usecase()
            .execute(bob, room_id("r1"), display_name("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(outcome.state.media_id.as_ref().map(MediaId::as_str), Some("X"));
        assert!(outcome.state.is_playing);
        let bob_messages = drain(&mut bob_rx);
        assert_eq!(bob_messages.len(), 3);
        assert_eq!(
            bob_messages[2],
            json!({
                "event": "videoStateResponse",
                "data": {"mediaId": "X", "position": 0.0, "isPlaying": true}
            })
        );
        // 既存の参加者には参加者リストのみが届く
        assert_eq!(
            drain(&mut alice_rx),
            vec![json!({"event": "participantList", "data": ["alice", "bob"]})]
        );
    }

    #[tokio::test]
    async fn test_second_join_from_same_connection_is_rejected() {
        // テスト項目: 同じ接続からの二重参加は拒否され、何も送信されない
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut rx) = harness.connect_and_join("c-alice", "r1", "alice").await;

        // when (操作):
        let result = harness
            .join_usecase()
            .execute(alice, room_id("r2"), display_name("alice"))
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::AlreadyJoined("r1".to_string())));
        assert!(drain(&mut rx).is_empty());
        assert_eq!(harness.repository.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_join_is_isolated_per_room() {
        // テスト項目: 別の Room への参加は他の Room の参加者に通知されない
        // given (前提条件):
        let harness = Harness::new();
        let (_alice, mut alice_rx) = harness.connect_and_join("c-alice", "A", "alice").await;
        let (bob, _bob_rx) = harness.connect("c-bob").await;

        // when (操作):
        harness
            .join_usecase()
            .execute(bob, room_id("B"), display_name("bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(drain(&mut alice_rx).is_empty());
        assert_eq!(harness.repository.count_rooms().await, 2);
    }
}
