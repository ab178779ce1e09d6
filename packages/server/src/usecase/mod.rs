//! UseCase 層
//!
//! 各ユースケースは Repository（Room 台帳）と MessagePusher（通知）を組み合わせ、
//! 「状態の変更 → 誰に何を送るか」を決定します。
//!
//! ## 直列化
//!
//! 状態を読み書きしてから通知をキューに積むまでの処理は、全ユースケースで共有する
//! `DispatchLock` を保持したまま行います。これにより、マルチスレッドのランタイム上でも
//! 1 つのイベントの処理が完了してから次のイベントが処理され、
//! 「状態の更新順」と「中継の送信順」が一致します。
//! 通知の送信はチャンネルへのキュー投入のみなので、ロックの保持時間は短く済みます。

use std::sync::Arc;

use tokio::sync::Mutex;

mod connect_client;
mod cursor_move;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod request_video_state;
mod video_control;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use cursor_move::CursorMoveUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    CursorMoveError, GetRoomDetailError, JoinRoomError, RequestVideoStateError, VideoControlError,
};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use request_video_state::RequestVideoStateUseCase;
pub use video_control::VideoControlUseCase;

/// イベント処理を直列化するロック
pub type DispatchLock = Arc<Mutex<()>>;

/// 新しい DispatchLock を作成
pub fn new_dispatch_lock() -> DispatchLock {
    Arc::new(Mutex::new(()))
}
