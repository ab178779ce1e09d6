//! Utilities shared by the watch-party server and client.

pub mod logger;
pub mod time;
