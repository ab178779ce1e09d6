//! UseCase: 接続の切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 参加者の削除、空になった Room の削除、残りの参加者への参加者リスト通知
//!
//! ### なぜこのテストが必要か
//! - 空の Room が台帳に残らないことを保証する
//! - 切断は次のイベントが処理される前に台帳へ反映されなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断、参加前の切断

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, RemovedParticipant, RoomRepository,
};

use super::DispatchLock;

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（Room 台帳の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    dispatch_lock: DispatchLock,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
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

    /// 切断を実行
    ///
    /// 接続は常に MessagePusher から登録解除されます。Room に参加していた場合は
    /// 台帳から削除し、Room が残っていれば残りの参加者に参加者リストを送ります。
    ///
    /// # Returns
    ///
    /// * `Some(RemovedParticipant)` - Room から削除された
    /// * `None` - どの Room にも参加していなかった
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<RemovedParticipant> {
        let _guard = self.dispatch_lock.lock().await;

        self.message_pusher.unregister_client(connection_id).await;
        let removed = self.repository.remove_participant(connection_id).await?;

        if !removed.room_deleted {
            self.broadcast_participant_list(&removed).await;
        }

        Some(removed)
    }

    async fn broadcast_participant_list(&self, removed: &RemovedParticipant) {
        let (members, names) = match (
            self.repository.connection_ids(&removed.room_id).await,
            self.repository.participant_names(&removed.room_id).await,
        ) {
            (Ok(members), Ok(names)) => (members, names),
            _ => return,
        };

        if let Err(e) = self
            .message_pusher
            .broadcast(members, &Notification::ParticipantList(names))
            .await
        {
            tracing::warn!(
                "Failed to broadcast participant list of '{}': {}",
                removed.room_id,
                e
            );
        }
    }
}
