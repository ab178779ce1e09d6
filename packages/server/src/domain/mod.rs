//! Domain layer: value objects, entities, the playback state machine and the
//! interfaces (repository, message pusher) the use cases depend on.

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod notification;
pub mod playback;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, Room};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use notification::{Notification, OpaquePayload};
pub use playback::{PlaybackCommand, PlaybackState, VideoAction};
pub use repository::{RemovedParticipant, RoomRepository};
pub use value_object::{ConnectionId, DisplayName, MediaId, RoomId, Timestamp};
