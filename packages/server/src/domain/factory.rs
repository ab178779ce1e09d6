//! Identifier factories.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Generates fresh connection identifiers (UUID v4)
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId::from(Uuid::new_v4())
    }
}
