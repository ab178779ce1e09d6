//! Watch-party room synchronization server.
//!
//! Participants join named rooms over WebSocket. The server keeps one
//! authoritative playback state per room, relays control actions and cursor
//! positions to the other participants, and pushes the current state to late
//! joiners.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
