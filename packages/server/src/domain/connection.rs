//! Live connection seam
//!
//! A [`Connection`] is the opaque handle the registry holds for one attached
//! client. Delivery goes through [`LiveSink`], which for real sockets is the
//! per-connection outbound queue drained by the socket writer task.

use std::{fmt, sync::Arc};

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{
    entity::ChatMessage,
    error::DeliveryFailure,
    value_object::{ConnectionId, GroupId, UserId},
};

/// Payload pushed to a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveUpdate {
    /// Bulk history replay, sent exactly once right after attach.
    History(Vec<ChatMessage>),
    /// One newly published message.
    Message(ChatMessage),
    /// A message from this connection was rejected. Never broadcast.
    Rejected(String),
}

/// Transport side of a live connection.
///
/// Implementations must not block: fan-out calls `push` for every connection
/// of a group in turn.
pub trait LiveSink: Send + Sync {
    fn push(&self, update: LiveUpdate) -> Result<(), DeliveryFailure>;
}

/// Updates a connection may have queued before it counts as lagging.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Outbound queue of a WebSocket connection.
pub type PusherChannel = mpsc::Sender<LiveUpdate>;

/// Bounded outbound queue for one connection.
pub fn pusher_channel() -> (PusherChannel, mpsc::Receiver<LiveUpdate>) {
    mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
}

impl LiveSink for PusherChannel {
    fn push(&self, update: LiveUpdate) -> Result<(), DeliveryFailure> {
        self.try_send(update).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryFailure::Lagged,
            TrySendError::Closed(_) => DeliveryFailure::Closed,
        })
    }
}

/// Handle to one attached client, tagged with its group.
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    group_id: GroupId,
    user_id: UserId,
    sink: Arc<dyn LiveSink>,
}

impl Connection {
    pub fn new(group_id: GroupId, user_id: UserId, sink: Arc<dyn LiveSink>) -> Self {
        Self {
            id: ConnectionId::generate(),
            group_id,
            user_id,
            sink,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn deliver(&self, update: LiveUpdate) -> Result<(), DeliveryFailure> {
        self.sink.push(update)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("group_id", &self.group_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
