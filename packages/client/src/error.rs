//! Error types for the watch-party client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server reported that the room cannot be joined
    #[error("Room '{0}' is not available")]
    RoomUnavailable(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Gave up after the configured number of reconnect attempts
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}

impl ClientError {
    /// Errors after which reconnecting would not help
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClientError::RoomUnavailable(_) | ClientError::ReconnectExhausted(_)
        )
    }
}
