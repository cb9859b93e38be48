//! Domain layer
//!
//! Value objects, entities, the bounded per-group history and the traits the
//! rest of the server depends on (directory lookups, live delivery seam).
//! Nothing in here knows about axum, DashMap or JSON.

pub mod connection;
pub mod entity;
pub mod error;
pub mod history;
pub mod repository;
pub mod value_object;

pub use connection::{
    Connection, LiveSink, LiveUpdate, OUTBOUND_QUEUE_CAPACITY, PusherChannel, pusher_channel,
};
pub use entity::{ChatMessage, Group, MessageDraft, User};
pub use error::{DeliveryFailure, DirectoryError, ValueObjectError};
pub use history::{DEFAULT_HISTORY_CAPACITY, GroupHistory};
pub use repository::{GroupDirectory, UserDirectory};
pub use value_object::{
    ConnectionId, GroupId, MAX_MESSAGE_LENGTH, MessageId, MessageText, Timestamp, UserId,
};
