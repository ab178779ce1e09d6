//! Conversion logic between DTOs and domain entities.

use watchparty_shared::time::timestamp_to_rfc3339;

use crate::domain::{Notification, PlaybackState, Room, VideoAction};
use crate::infrastructure::dto::{http as http_dto, websocket as ws_dto};

// ========================================
// DTO → Domain
// ========================================

impl From<ws_dto::ControlAction> for VideoAction {
    fn from(action: ws_dto::ControlAction) -> Self {
        match action {
            ws_dto::ControlAction::Load => VideoAction::Load,
            ws_dto::ControlAction::Play => VideoAction::Play,
            ws_dto::ControlAction::Pause => VideoAction::Pause,
            ws_dto::ControlAction::Seek => VideoAction::Seek,
            ws_dto::ControlAction::Sync => VideoAction::Sync,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<VideoAction> for ws_dto::ControlAction {
    fn from(action: VideoAction) -> Self {
        match action {
            VideoAction::Load => ws_dto::ControlAction::Load,
            VideoAction::Play => ws_dto::ControlAction::Play,
            VideoAction::Pause => ws_dto::ControlAction::Pause,
            VideoAction::Seek => ws_dto::ControlAction::Seek,
            VideoAction::Sync => ws_dto::ControlAction::Sync,
        }
    }
}

impl From<&PlaybackState> for ws_dto::PlaybackStateDto {
    fn from(state: &PlaybackState) -> Self {
        Self {
            media_id: state.media_id.as_ref().map(|id| id.as_str().to_string()),
            position: state.position,
            is_playing: state.is_playing,
        }
    }
}

impl From<&Notification> for ws_dto::ServerEvent {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::RoomExists(exists) => ws_dto::ServerEvent::RoomExists(*exists),
            Notification::ParticipantList(names) => ws_dto::ServerEvent::ParticipantList(
                names.iter().map(|n| n.as_str().to_string()).collect(),
            ),
            Notification::VideoState(state) => ws_dto::ServerEvent::VideoStateResponse(state.into()),
            Notification::VideoControl { action, payload } => {
                ws_dto::ServerEvent::VideoControl(ws_dto::VideoControlBroadcast {
                    action: (*action).into(),
                    payload: payload.as_value().clone(),
                })
            }
            Notification::CursorMove(payload) => {
                ws_dto::ServerEvent::CursorMove(payload.as_value().clone())
            }
        }
    }
}

impl From<&Room> for http_dto::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| p.display_name.as_str().to_string())
                .collect(),
            playback: (&room.playback).into(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http_dto::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            participants: room
                .participants
                .iter()
                .map(|p| http_dto::ParticipantDetailDto {
                    connection_id: p.connection_id.as_str().to_string(),
                    display_name: p.display_name.as_str().to_string(),
                    joined_at: timestamp_to_rfc3339(p.joined_at.value()),
                })
                .collect(),
            playback: (&room.playback).into(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
