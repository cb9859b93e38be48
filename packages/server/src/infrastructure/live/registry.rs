//! Connection registry: per-group sets of attached live connections.
//!
//! Groups are sharded through a `DashMap`, so operations on different groups
//! never wait on one another. Every operation on a single group's set runs
//! under that group's shard lock and no lock is held once a call returns.

use std::collections::HashMap;

use dashmap::DashMap;

use crate::domain::{Connection, ConnectionId, GroupId};

/// Group id → attached connections.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    groups: DashMap<GroupId, HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection under the group it is tagged with.
    pub fn attach(&self, connection: Connection) {
        let group_id = connection.group_id().clone();
        let connection_id = connection.id();
        let previous = self
            .groups
            .entry(group_id.clone())
            .or_default()
            .insert(connection_id, connection);
        debug_assert!(previous.is_none(), "connection attached twice");

        tracing::debug!(
            group_id = %group_id,
            connection_id = %connection_id,
            "Connection attached"
        );
    }

    /// Detach a connection. Returns `false` if it was not attached.
    ///
    /// A group whose set becomes empty is pruned.
    pub fn detach(&self, group_id: &GroupId, connection_id: ConnectionId) -> bool {
        let Some(mut connections) = self.groups.get_mut(group_id) else {
            return false;
        };
        let removed = connections.remove(&connection_id).is_some();
        let now_empty = connections.is_empty();
        drop(connections);

        if now_empty {
            // Re-checked under the shard lock: an attach may have slipped in.
            self.groups
                .remove_if(group_id, |_, connections| connections.is_empty());
        }

        if removed {
            tracing::debug!(
                group_id = %group_id,
                connection_id = %connection_id,
                "Connection detached"
            );
        }
        removed
    }

    /// Point-in-time copy of a group's connections.
    pub fn snapshot(&self, group_id: &GroupId) -> Vec<Connection> {
        self.groups
            .get(group_id)
            .map(|connections| connections.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, group_id: &GroupId, connection_id: ConnectionId) -> bool {
        self.groups
            .get(group_id)
            .is_some_and(|connections| connections.contains_key(&connection_id))
    }

    pub fn connection_count(&self, group_id: &GroupId) -> usize {
        self.groups
            .get(group_id)
            .map(|connections| connections.len())
            .unwrap_or(0)
    }

    /// Number of groups with at least one attached connection.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
