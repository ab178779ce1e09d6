//! UseCase: カーソル位置の中継
//!
//! 状態を持たない中継です。受け取った位置データをそのまま、送信者以外の
//! Room の全員に 1 回だけ送ります。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, OpaquePayload, RoomId, RoomRepository,
};

use super::{DispatchLock, error::CursorMoveError};

pub struct CursorMoveUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    dispatch_lock: DispatchLock,
}

impl CursorMoveUseCase {
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
        sender: &ConnectionId,
        room_id: RoomId,
        position_data: OpaquePayload,
    ) -> Result<Vec<ConnectionId>, CursorMoveError> {
        let _guard = self.dispatch_lock.lock().await;

        let targets: Vec<ConnectionId> = self
            .repository
            .connection_ids(&room_id)
            .await
            .map_err(|_| CursorMoveError::RoomNotFound(room_id.as_str().to_string()))?
            .into_iter()
            .filter(|id| id != sender)
            .collect();

        self.message_pusher
            .broadcast(targets.clone(), &Notification::CursorMove(position_data))
            .await
            .map_err(|e| CursorMoveError::BroadcastFailed(e.to_string()))?;

        Ok(targets)
    }
}
