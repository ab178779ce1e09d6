//! Media player abstraction and a clock-driven simulated player.

use std::{fmt, sync::Arc};

use watchparty_shared::time::Clock;

/// Player status as reported to the sync logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    /// Nothing loaded yet
    Unstarted,
    Playing,
    Paused,
    /// Media loaded and waiting at its start position
    Cued,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerStatus::Unstarted => "unstarted",
            PlayerStatus::Playing => "playing",
            PlayerStatus::Paused => "paused",
            PlayerStatus::Cued => "cued",
        };
        f.write_str(name)
    }
}

/// Minimal surface of a video player that the sync logic drives.
pub trait MediaPlayer: Send {
    /// Load `media_id` paused at `start` seconds
    fn load(&mut self, media_id: &str, start: f64);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position: f64);
    /// Current position in seconds
    fn current_position(&self) -> f64;
    fn status(&self) -> PlayerStatus;
    fn media_id(&self) -> Option<&str>;
}

/// Player without any media backend. The position advances with the clock
/// while playing.
pub struct SimulatedPlayer {
    clock: Arc<dyn Clock>,
    media_id: Option<String>,
    status: PlayerStatus,
    /// Position captured at `anchor_millis`
    position: f64,
    anchor_millis: i64,
}

impl SimulatedPlayer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let anchor_millis = clock.now_millis();
        Self {
            clock,
            media_id: None,
            status: PlayerStatus::Unstarted,
            position: 0.0,
            anchor_millis,
        }
    }

    fn rebase(&mut self, position: f64) {
        self.position = position.max(0.0);
        self.anchor_millis = self.clock.now_millis();
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn load(&mut self, media_id: &str, start: f64) {
        self.media_id = Some(media_id.to_string());
        self.status = PlayerStatus::Cued;
        self.rebase(start);
    }

    fn play(&mut self) {
        if self.media_id.is_none() {
            return;
        }
        let position = self.current_position();
        self.rebase(position);
        self.status = PlayerStatus::Playing;
    }

    fn pause(&mut self) {
        if self.media_id.is_none() {
            return;
        }
        let position = self.current_position();
        self.rebase(position);
        self.status = PlayerStatus::Paused;
    }

    fn seek_to(&mut self, position: f64) {
        if self.media_id.is_none() {
            return;
        }
        self.rebase(position);
        if self.status == PlayerStatus::Cued {
            self.status = PlayerStatus::Paused;
        }
    }

    fn current_position(&self) -> f64 {
        match self.status {
            PlayerStatus::Playing => {
                let elapsed = self.clock.now_millis() - self.anchor_millis;
                self.position + elapsed as f64 / 1000.0
            }
            _ => self.position,
        }
    }

    fn status(&self) -> PlayerStatus {
        self.status
    }

    fn media_id(&self) -> Option<&str> {
        self.media_id.as_deref()
    }
}
