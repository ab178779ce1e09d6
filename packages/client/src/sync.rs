//! Playback reconciliation between the local player and the room.
//!
//! Remote actions are applied to the local player. Local changes are turned
//! into outbound control actions, except while the suppression window opened
//! by a remote jump is still running, so a jump we were told to make is not
//! echoed back to the room.

use std::{sync::Arc, time::Duration};

use serde_json::{Value, json};
use watchparty_server::infrastructure::dto::websocket::{ControlAction, PlaybackStateDto};
use watchparty_shared::time::Clock;

use crate::player::{MediaPlayer, PlayerStatus};

/// Interval of the position heartbeat
pub const SYNC_INTERVAL: Duration = Duration::from_secs(1);

/// Remote `sync` only moves the local player when drift exceeds this
pub const DRIFT_THRESHOLD_SECS: f64 = 2.0;

pub const SUPPRESSION_WINDOW_MILLIS: i64 = 1_000;

const MEDIA_ID_KEY: &str = "mediaId";
const POSITION_KEY: &str = "position";

/// Control action to send to the room
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundControl {
    pub action: ControlAction,
    pub payload: Value,
}

impl OutboundControl {
    fn new(action: ControlAction, payload: Value) -> Self {
        Self { action, payload }
    }
}

pub struct SyncReconciler<P> {
    player: P,
    clock: Arc<dyn Clock>,
    suppressed_until: Option<i64>,
}

impl<P: MediaPlayer> SyncReconciler<P> {
    pub fn new(player: P, clock: Arc<dyn Clock>) -> Self {
        Self {
            player,
            clock,
            suppressed_until: None,
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self.suppressed_until, Some(until) if self.clock.now_millis() < until)
    }

    fn suppress(&mut self) {
        self.suppressed_until = Some(self.clock.now_millis() + SUPPRESSION_WINDOW_MILLIS);
    }

    fn emit(&self, action: ControlAction, payload: Value) -> Option<OutboundControl> {
        if self.is_suppressed() {
            tracing::debug!("Suppressed outbound '{:?}'", action);
            return None;
        }
        Some(OutboundControl::new(action, payload))
    }

    /// Apply a control action relayed from another participant.
    ///
    /// Returns `false` when the action left the local player untouched.
    pub fn apply_remote(&mut self, action: ControlAction, payload: &Value) -> bool {
        match action {
            ControlAction::Load => match media_id_of(payload) {
                Some(media_id) => {
                    self.player.load(media_id, 0.0);
                    true
                }
                None => false,
            },
            ControlAction::Play => {
                self.player.play();
                true
            }
            ControlAction::Pause => {
                self.player.pause();
                true
            }
            ControlAction::Seek => {
                self.suppress();
                self.player.seek_to(position_of(payload));
                true
            }
            ControlAction::Sync => {
                let target = position_of(payload);
                let drift = (self.player.current_position() - target).abs();
                if drift > DRIFT_THRESHOLD_SECS {
                    self.suppress();
                    self.player.seek_to(target);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Adopt the room's authoritative state. A state without media leaves the
    /// player untouched.
    pub fn apply_state(&mut self, state: &PlaybackStateDto) -> bool {
        let Some(media_id) = state.media_id.as_deref().filter(|id| !id.is_empty()) else {
            return false;
        };

        self.player.load(media_id, state.position);
        if state.is_playing {
            self.player.play();
        } else {
            self.player.pause();
        }
        true
    }

    /// Load media locally. The load itself is always sent; the `sync` for the
    /// resulting cued state follows the suppression rule.
    pub fn local_load(&mut self, media_id: &str) -> Vec<OutboundControl> {
        self.player.load(media_id, 0.0);

        let mut outbound = vec![OutboundControl::new(
            ControlAction::Load,
            json!({ MEDIA_ID_KEY: media_id }),
        )];
        if self.player.status() == PlayerStatus::Cued {
            outbound.extend(self.emit(
                ControlAction::Sync,
                json!({ POSITION_KEY: self.player.current_position() }),
            ));
        }
        outbound
    }

    pub fn local_play(&mut self) -> Option<OutboundControl> {
        self.player.media_id()?;
        self.player.play();
        self.emit(ControlAction::Play, json!({}))
    }

    pub fn local_pause(&mut self) -> Option<OutboundControl> {
        self.player.media_id()?;
        self.player.pause();
        self.emit(ControlAction::Pause, json!({}))
    }

    pub fn local_seek(&mut self, position: f64) -> Option<OutboundControl> {
        self.player.media_id()?;
        self.player.seek_to(position);
        self.emit(
            ControlAction::Seek,
            json!({ POSITION_KEY: self.player.current_position() }),
        )
    }

    /// Periodic position report
    pub fn heartbeat(&self) -> Option<OutboundControl> {
        self.player.media_id()?;
        self.emit(
            ControlAction::Sync,
            json!({ POSITION_KEY: self.player.current_position() }),
        )
    }
}

fn media_id_of(payload: &Value) -> Option<&str> {
    payload
        .get(MEDIA_ID_KEY)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

fn position_of(payload: &Value) -> f64 {
    payload
        .get(POSITION_KEY)
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}
