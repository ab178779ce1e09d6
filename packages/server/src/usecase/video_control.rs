//! UseCase: 再生制御アクション
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - VideoControlUseCase::execute() メソッド
//! - 再生状態の更新と、送信者以外への中継
//!
//! ### なぜこのテストが必要か
//! - 送信者が自分の中継を受け取らないこと（自己除外）を保証する
//! - 中継されるのは再計算した状態ではなく、元のアクションとペイロードであることを確認する
//! - 他の Room に中継が漏れないこと（分離）を確認する
//!
//! ### どのような状況を想定しているか
//! - 正常系：load / play / seek の中継
//! - 異常系：存在しない Room へのアクション

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, OpaquePayload, PlaybackCommand, RoomId,
    RoomRepository, VideoAction,
};

use super::{DispatchLock, error::VideoControlError};

/// 再生制御のユースケース
pub struct VideoControlUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    dispatch_lock: DispatchLock,
}

impl VideoControlUseCase {
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

    /// アクションを Room の再生状態に適用し、送信者以外の全員に中継する
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 中継先の接続 ID リスト
    /// * `Err(VideoControlError::RoomNotFound)` - Room が存在しない（何も変更しない）
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        room_id: RoomId,
        action: VideoAction,
        payload: OpaquePayload,
    ) -> Result<Vec<ConnectionId>, VideoControlError> {
        let _guard = self.dispatch_lock.lock().await;

        let command = PlaybackCommand::from_action(action, &payload);
        let state = self
            .repository
            .apply_action(&room_id, &command)
            .await
            .map_err(|_| VideoControlError::RoomNotFound(room_id.as_str().to_string()))?;
        tracing::debug!(
            "Room '{}' after '{}': media={:?} position={} playing={}",
            room_id,
            action,
            state.media_id.as_ref().map(|m| m.as_str()),
            state.position,
            state.is_playing
        );

        let targets = self.broadcast_targets(&room_id, sender).await?;
        self.message_pusher
            .broadcast(
                targets.clone(),
                &Notification::VideoControl { action, payload },
            )
            .await
            .map_err(|e| VideoControlError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }

    /// 送信者以外の全ての接続 ID を返す
    async fn broadcast_targets(
        &self,
        room_id: &RoomId,
        exclude: &ConnectionId,
    ) -> Result<Vec<ConnectionId>, VideoControlError> {
        let members = self
            .repository
            .connection_ids(room_id)
            .await
            .map_err(|_| VideoControlError::RoomNotFound(room_id.as_str().to_string()))?;
        Ok(members.into_iter().filter(|id| id != exclude).collect())
    }
}
