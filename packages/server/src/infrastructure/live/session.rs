//! Live session guard.
//!
//! Returned by `OpenLiveSessionUseCase` once the connection is attached and
//! its history replay queued. Dropping the session detaches the connection,
//! so a connection task can never exit while still registered.

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, DeliveryFailure, GroupId, LiveUpdate, User, UserId};

use super::channel::GroupChannel;

/// An attached live connection together with the verified sender identity.
pub struct LiveSession {
    connection: Connection,
    user: User,
    channel: Arc<GroupChannel>,
}

impl LiveSession {
    pub(crate) fn new(connection: Connection, user: User, channel: Arc<GroupChannel>) -> Self {
        Self {
            connection,
            user,
            channel,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection.id()
    }

    pub fn group_id(&self) -> &GroupId {
        self.connection.group_id()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Display name resolved from the directory when the session opened.
    pub fn user_name(&self) -> &str {
        &self.user.name
    }

    /// Push an update to this session's connection only.
    pub fn notify(&self, update: LiveUpdate) -> Result<(), DeliveryFailure> {
        self.connection.deliver(update)
    }

    pub fn is_attached(&self) -> bool {
        self.channel
            .registry()
            .contains(self.connection.group_id(), self.connection.id())
    }

    /// Detach explicitly. Equivalent to dropping the session.
    pub fn close(self) {}
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        if self
            .channel
            .leave(self.connection.group_id(), self.connection.id())
        {
            tracing::info!(
                group_id = %self.connection.group_id(),
                connection_id = %self.connection.id(),
                user_id = %self.user.id,
                "Live session closed"
            );
        }
    }
}
