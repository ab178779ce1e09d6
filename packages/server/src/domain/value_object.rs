//! Value objects used across the domain.
//!
//! All of them wrap a `String` and reject the empty string, mirroring what
//! the wire protocol treats as "missing".

use std::fmt;

use super::error::ValueObjectError;

macro_rules! string_value_object {
    ($(#[$meta:meta])* $name:ident, $err:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.is_empty() {
                    return Err($err);
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_value_object!(
    /// Externally supplied, opaque room identifier
    RoomId,
    ValueObjectError::EmptyRoomId
);

string_value_object!(
    /// Per-connection identifier, unique for the lifetime of the process
    ConnectionId,
    ValueObjectError::EmptyConnectionId
);

string_value_object!(
    /// Name a participant shows to the rest of the room
    DisplayName,
    ValueObjectError::EmptyDisplayName
);

string_value_object!(
    /// Identifier of an externally embeddable media item
    MediaId,
    ValueObjectError::EmptyMediaId
);

impl From<uuid::Uuid> for ConnectionId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
