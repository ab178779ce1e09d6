//! UseCase 層のエラー型
//!
//! これらのエラーはワイヤーには載りません。UI 層でログに記録して破棄します。

use thiserror::Error;

use crate::domain::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// 接続が既に別の（または同じ）Room に参加している
    #[error("connection already joined room '{0}'")]
    AlreadyJoined(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoControlError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestVideoStateError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorMoveError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}
