//! Headless watch-party participant.
//!
//! Joins a room over WebSocket, keeps a simulated player in step with the
//! room's authoritative playback state and turns stdin commands into control
//! actions.

pub mod command;
pub mod error;
pub mod formatter;
pub mod media_link;
pub mod player;
pub mod runner;
pub mod session;
pub mod sync;
mod ui;

pub use error::ClientError;
pub use runner::run_client;
