//! Server state and connection management.

use std::sync::Arc;

use crate::{
    domain::{MessagePusher, RoomRepository},
    usecase::{
        ConnectClientUseCase, CursorMoveUseCase, DisconnectParticipantUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, RequestVideoStateUseCase,
        VideoControlUseCase, new_dispatch_lock,
    },
};

/// Shared application state
pub struct AppState {
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub video_control_usecase: Arc<VideoControlUseCase>,
    pub request_video_state_usecase: Arc<RequestVideoStateUseCase>,
    pub cursor_move_usecase: Arc<CursorMoveUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Wire every use case around one registry and one message pusher.
    ///
    /// All event-handling use cases share a single dispatch lock so inbound
    /// events are processed one at a time.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        let dispatch_lock = new_dispatch_lock();
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                dispatch_lock.clone(),
            )),
            video_control_usecase: Arc::new(VideoControlUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                dispatch_lock.clone(),
            )),
            request_video_state_usecase: Arc::new(RequestVideoStateUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                dispatch_lock.clone(),
            )),
            cursor_move_usecase: Arc::new(CursorMoveUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                dispatch_lock.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher,
                dispatch_lock,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
        }
    }
}
