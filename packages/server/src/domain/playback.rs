//! Authoritative playback state and the control-action state machine.
//!
//! | action  | effect                                             |
//! |---------|----------------------------------------------------|
//! | `load`  | media := payload.mediaId, position := 0, paused    |
//! | `play`  | playing                                            |
//! | `pause` | paused                                             |
//! | `seek`  | position := payload.position (0 when absent)       |
//! | `sync`  | same as `seek` on the server                       |
//!
//! No validation happens here beyond keeping the position finite and
//! non-negative; the server is a last-write-wins cache.

use std::fmt;

use super::{notification::OpaquePayload, value_object::MediaId};

/// Payload key carrying the media id of a `load`
pub const MEDIA_ID_KEY: &str = "mediaId";
/// Payload key carrying the position (seconds) of a `seek` / `sync`
pub const POSITION_KEY: &str = "position";

/// Control actions a participant can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoAction {
    Load,
    Play,
    Pause,
    Seek,
    Sync,
}

impl VideoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoAction::Load => "load",
            VideoAction::Play => "play",
            VideoAction::Pause => "pause",
            VideoAction::Seek => "seek",
            VideoAction::Sync => "sync",
        }
    }
}

impl fmt::Display for VideoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A control action with its payload interpreted
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Load(Option<MediaId>),
    Play,
    Pause,
    Seek(f64),
    Sync(f64),
}

impl PlaybackCommand {
    /// Interpret a relayed payload for the given action.
    ///
    /// Missing or ill-typed fields fall back to "no media" / position 0.
    pub fn from_action(action: VideoAction, payload: &OpaquePayload) -> Self {
        let position = || payload.f64_field(POSITION_KEY).unwrap_or(0.0);
        match action {
            VideoAction::Load => PlaybackCommand::Load(
                payload
                    .str_field(MEDIA_ID_KEY)
                    .and_then(|id| MediaId::new(id.to_string()).ok()),
            ),
            VideoAction::Play => PlaybackCommand::Play,
            VideoAction::Pause => PlaybackCommand::Pause,
            VideoAction::Seek => PlaybackCommand::Seek(position()),
            VideoAction::Sync => PlaybackCommand::Sync(position()),
        }
    }
}

/// Playback state of a room
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlaybackState {
    pub media_id: Option<MediaId>,
    /// Seconds from the start of the media, always `>= 0`
    pub position: f64,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn new(media_id: Option<MediaId>, position: f64, is_playing: bool) -> Self {
        Self {
            media_id,
            position: sanitize_position(position),
            is_playing,
        }
    }

    pub fn apply(&mut self, command: &PlaybackCommand) {
        match command {
            PlaybackCommand::Load(media_id) => {
                self.media_id = media_id.clone();
                self.position = 0.0;
                self.is_playing = false;
            }
            PlaybackCommand::Play => self.is_playing = true,
            PlaybackCommand::Pause => self.is_playing = false,
            PlaybackCommand::Seek(position) | PlaybackCommand::Sync(position) => {
                self.position = sanitize_position(*position);
            }
        }
    }
}

fn sanitize_position(position: f64) -> f64 {
    if position.is_finite() && position > 0.0 {
        position
    } else {
        0.0
    }
}
