//! Messages the server pushes to connections.
//!
//! The use cases decide *who* receives *what*; how a notification is put on
//! the wire is up to the `MessagePusher` implementation.

use serde_json::Value;

use super::{playback::PlaybackState, playback::VideoAction, value_object::DisplayName};

/// Client-supplied JSON the server relays without interpreting it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpaquePayload(Value);

impl OpaquePayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Read a string field of an object payload.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Read a numeric field of an object payload.
    pub fn f64_field(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }
}

/// A server → client notification
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Answer to a join. Always `true`: joining creates unknown rooms.
    RoomExists(bool),
    /// Display names of the room's participants, in join order
    ParticipantList(Vec<DisplayName>),
    /// Authoritative playback state of the room
    VideoState(PlaybackState),
    /// A control action relayed verbatim from another participant
    VideoControl {
        action: VideoAction,
        payload: OpaquePayload,
    },
    /// Cursor position data relayed verbatim from another participant
    CursorMove(OpaquePayload),
}
