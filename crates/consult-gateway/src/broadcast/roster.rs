//! Roster broadcaster
//!
//! Snapshots are taken and enqueued while holding one sequencer lock, so
//! the order rosters land in every outbound queue matches the order they
//! were read from the registry. No connection sees an older roster after a
//! newer one.

use std::sync::Arc;

use consult_store::UserRegistry;
use parking_lot::Mutex;

use crate::connection::{Connection, ConnectionManager};
use crate::protocol::{Outbound, ProtocolError, ServerEvent};

/// Publishes `users:update` (and `users:list`) frames
#[derive(Debug, Default)]
pub struct RosterBroadcaster {
    /// Number of rosters published so far
    sequence: Mutex<u64>,
}

impl RosterBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcast the current roster to every connection
    pub fn publish(
        &self,
        users: &UserRegistry,
        connections: &ConnectionManager,
    ) -> Result<usize, ProtocolError> {
        self.publish_inner(users, connections, None)
    }

    /// Broadcast the roster, then send the same snapshot to `recipient` as
    /// `users:list`
    pub fn publish_with_list(
        &self,
        users: &UserRegistry,
        connections: &ConnectionManager,
        recipient: &Arc<Connection>,
    ) -> Result<usize, ProtocolError> {
        self.publish_inner(users, connections, Some(recipient))
    }

    fn publish_inner(
        &self,
        users: &UserRegistry,
        connections: &ConnectionManager,
        recipient: Option<&Arc<Connection>>,
    ) -> Result<usize, ProtocolError> {
        let mut sequence = self.sequence.lock();

        let roster = users.get_all();
        let list = recipient
            .map(|_| Outbound::event(&ServerEvent::UsersList(roster.clone())))
            .transpose()?;
        let update = Outbound::event(&ServerEvent::UsersUpdate(roster))?;

        let sent = connections.broadcast(&update);
        if let (Some(conn), Some(list)) = (recipient, list) {
            conn.try_send(list);
        }

        *sequence += 1;
        tracing::debug!(sequence = *sequence, sent, "Roster broadcast");
        Ok(sent)
    }

    /// Number of rosters published so far
    pub fn published(&self) -> u64 {
        *self.sequence.lock()
    }
}
