//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{error::ClientError, session::run_client_session, ui::spawn_input_reader};

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Run the watch-party client with reconnection logic
///
/// # Errors
///
/// Returns `ClientError::RoomUnavailable` if the server refuses the room and
/// `ClientError::ReconnectExhausted` once every reconnect attempt failed.
pub async fn run_client(url: String, room: String, name: String) -> Result<(), ClientError> {
    let mut input_rx = spawn_input_reader(&name);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' in room '{}' (attempt {}/{})",
            url,
            name,
            room,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &room, &name, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If the session ended normally (user exit), don't reconnect
                return Ok(());
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    return Err(ClientError::ReconnectExhausted(MAX_RECONNECT_ATTEMPTS));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL.as_secs(),
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(RECONNECT_INTERVAL).await;
            }
        }
    }
}
