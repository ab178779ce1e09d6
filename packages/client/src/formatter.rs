//! Message formatting utilities for client display.

use serde_json::Value;
use watchparty_server::infrastructure::dto::websocket::{ControlAction, PlaybackStateDto};
use watchparty_shared::time::timestamp_to_rfc3339;

use crate::player::PlayerStatus;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn format_joined(room: &str) -> String {
        format!("\nJoined room '{}'\n", room)
    }

    /// Format the participant list, marking the current participant
    ///
    /// # Arguments
    ///
    /// * `names` - Display names in join order
    /// * `me` - The current participant's display name
    pub fn format_participants(names: &[String], me: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Participants:\n");

        if names.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            let mut marked = false;
            for name in names {
                // Names are not unique; mark only the first match.
                let suffix = if !marked && name == me {
                    marked = true;
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("{}{}\n", name, suffix));
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the authoritative state received from the room
    pub fn format_room_state(state: &PlaybackStateDto) -> String {
        match &state.media_id {
            Some(media_id) => format!(
                "\nRoom state: '{}' at {:.1}s ({})\n",
                media_id,
                state.position,
                if state.is_playing { "playing" } else { "paused" }
            ),
            None => "\nRoom state: nothing loaded\n".to_string(),
        }
    }

    /// Format the local player snapshot for `/state`
    pub fn format_local_state(
        media_id: Option<&str>,
        position: f64,
        status: PlayerStatus,
        suppressed: bool,
    ) -> String {
        let media = media_id.unwrap_or("-");
        let suppressed = if suppressed { ", suppressed" } else { "" };
        format!(
            "\nLocal player: '{}' at {:.1}s ({}{})\n",
            media, position, status, suppressed
        )
    }

    /// Format a control action relayed from another participant
    ///
    /// # Arguments
    ///
    /// * `action` - The relayed action
    /// * `payload` - The action payload as sent by its originator
    /// * `applied` - Whether the local player changed
    /// * `received_at` - Unix timestamp of receipt (milliseconds)
    pub fn format_remote_control(
        action: ControlAction,
        payload: &Value,
        applied: bool,
        received_at: i64,
    ) -> String {
        let note = if applied { "" } else { " (no change)" };
        format!(
            "\n<- {} {}{} at {}\n",
            action_name(action),
            payload,
            note,
            timestamp_to_rfc3339(received_at)
        )
    }

    pub fn format_cursor(position_data: &Value) -> String {
        format!("\n<- cursor {}\n", position_data)
    }

    pub fn format_sent(action: ControlAction, payload: &Value) -> String {
        format!("-> {} {}\n", action_name(action), payload)
    }

    pub fn format_error(message: &str) -> String {
        format!("\n! {}\n", message)
    }

    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n<- Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n<- Received: {}\n", text)
    }

    pub fn format_help() -> String {
        [
            "",
            "Commands:",
            "  /load <link-or-id>   load a video for the whole room",
            "  /play                start playback",
            "  /pause               pause playback",
            "  /seek <seconds>      jump to a position",
            "  /cursor <x> <y>      share a cursor position",
            "  /state               show the local player",
            "  /help                show this help",
            "",
        ]
        .join("\n")
    }
}

fn action_name(action: ControlAction) -> &'static str {
    match action {
        ControlAction::Load => "load",
        ControlAction::Play => "play",
        ControlAction::Pause => "pause",
        ControlAction::Seek => "seek",
        ControlAction::Sync => "sync",
    }
}
