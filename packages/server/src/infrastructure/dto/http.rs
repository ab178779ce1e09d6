//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PlaybackStateDto;

/// Entry of `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    /// Display names in join order
    pub participants: Vec<String>,
    pub playback: PlaybackStateDto,
    /// RFC 3339
    pub created_at: String,
}

/// Body of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantDetailDto>,
    pub playback: PlaybackStateDto,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub connection_id: String,
    pub display_name: String,
    pub joined_at: String,
}
