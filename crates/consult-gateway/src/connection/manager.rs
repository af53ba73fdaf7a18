//! Connection manager
//!
//! Manages all active WebSocket connections and room groups using DashMap
//! for thread-safe access. Fan-out never awaits: every send is a `try_send`
//! onto the connection's writer channel.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::Connection;
use crate::protocol::Outbound;

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    /// Active connections by handle
    connections: DashMap<String, Arc<Connection>>,

    /// Room id to connection handles
    room_groups: DashMap<String, HashSet<String>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            room_groups: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection under a fresh handle
    pub fn add_connection(&self, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let connection = Connection::new(sender);
        self.connections
            .insert(connection.id().to_string(), Arc::clone(&connection));

        tracing::debug!(connection_id = %connection.id(), "Connection added");
        connection
    }

    /// Remove a connection and detach it from every room group
    pub fn remove_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(connection_id)?;

        for room_id in connection.take_rooms() {
            self.remove_from_group(&room_id, connection_id);
        }

        tracing::debug!(connection_id = %connection_id, "Connection removed");
        Some(connection)
    }

    /// Get a connection by handle
    pub fn get_connection(&self, connection_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(connection_id).map(|r| Arc::clone(r.value()))
    }

    // === Room groups ===

    /// Attach a connection to a room group
    pub fn join_room(&self, connection_id: &str, room_id: &str) -> bool {
        let Some(connection) = self.get_connection(connection_id) else {
            return false;
        };

        connection.add_room(room_id);
        self.room_groups
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string());

        // Lost a race with remove_connection: undo so the group holds no stale handle
        if !self.connections.contains_key(connection_id) {
            connection.remove_room(room_id);
            self.remove_from_group(room_id, connection_id);
            return false;
        }

        tracing::trace!(connection_id = %connection_id, room_id = %room_id, "Joined room group");
        true
    }

    /// Detach a connection from a room group
    pub fn leave_room(&self, connection_id: &str, room_id: &str) -> bool {
        if let Some(connection) = self.get_connection(connection_id) {
            connection.remove_room(room_id);
        }
        let removed = self.remove_from_group(room_id, connection_id);

        if removed {
            tracing::trace!(connection_id = %connection_id, room_id = %room_id, "Left room group");
        }
        removed
    }

    fn remove_from_group(&self, room_id: &str, connection_id: &str) -> bool {
        let removed = self
            .room_groups
            .get_mut(room_id)
            .is_some_and(|mut members| members.remove(connection_id));

        // Drop the group once empty; a concurrent join re-creates it
        self.room_groups.remove_if(room_id, |_, members| members.is_empty());
        removed
    }

    /// Get all connections in a room group
    pub fn get_room_connections(&self, room_id: &str) -> Vec<Arc<Connection>> {
        let handles: Vec<String> = self
            .room_groups
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();

        handles
            .iter()
            .filter_map(|id| self.get_connection(id))
            .collect()
    }

    // === Fan-out ===

    /// Send a frame to every connection in a room group
    pub fn send_to_room(&self, room_id: &str, frame: &Outbound) -> usize {
        let sent = self
            .get_room_connections(room_id)
            .iter()
            .filter(|conn| conn.try_send(frame.clone()))
            .count();

        tracing::trace!(room_id = %room_id, sent, "Frame sent to room group");
        sent
    }

    /// Send a frame to every connection
    pub fn broadcast(&self, frame: &Outbound) -> usize {
        let connections: Vec<Arc<Connection>> =
            self.connections.iter().map(|r| Arc::clone(r.value())).collect();

        let sent = connections
            .iter()
            .filter(|conn| conn.try_send(frame.clone()))
            .count();

        tracing::trace!(sent, total = connections.len(), "Frame broadcast");
        sent
    }

    // === Stats ===

    /// Number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of non-empty room groups
    pub fn room_count(&self) -> usize {
        self.room_groups.len()
    }

    /// Number of connections in a room group
    pub fn room_size(&self, room_id: &str) -> usize {
        self.room_groups.get(room_id).map_or(0, |members| members.len())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connection_count())
            .field("room_groups", &self.room_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::Receiver;

    fn connect(manager: &ConnectionManager) -> (Arc<Connection>, Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(8);
        (manager.add_connection(tx), rx)
    }

    fn text(body: &str) -> Outbound {
        Outbound::Text(Arc::from(body))
    }

    fn drain(rx: &mut Receiver<Outbound>) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            if let Outbound::Text(body) = frame {
                frames.push(body.to_string());
            }
        }
        frames
    }

    #[test]
    fn test_add_and_remove() {
        let manager = ConnectionManager::new();
        let (conn, _rx) = connect(&manager);

        assert_eq!(manager.connection_count(), 1);
        assert!(manager.get_connection(conn.id()).is_some());

        assert!(manager.remove_connection(conn.id()).is_some());
        assert!(manager.remove_connection(conn.id()).is_none());
        assert_eq!(manager.connection_count(), 0);
    }

    #[test]
    fn test_room_fan_out_is_isolated() {
        let manager = ConnectionManager::new();
        let (a, mut rx_a) = connect(&manager);
        let (b, mut rx_b) = connect(&manager);
        let (_c, mut rx_c) = connect(&manager);

        assert!(manager.join_room(a.id(), "room-1"));
        assert!(manager.join_room(b.id(), "room-2"));

        assert_eq!(manager.send_to_room("room-1", &text("one")), 1);
        assert_eq!(manager.send_to_room("missing", &text("none")), 0);

        assert_eq!(drain(&mut rx_a), vec!["one"]);
        assert!(drain(&mut rx_b).is_empty());
        assert!(drain(&mut rx_c).is_empty());
    }

    #[test]
    fn test_broadcast_reaches_everyone() {
        let manager = ConnectionManager::new();
        let (_a, mut rx_a) = connect(&manager);
        let (_b, mut rx_b) = connect(&manager);

        assert_eq!(manager.broadcast(&text("all")), 2);
        assert_eq!(drain(&mut rx_a), vec!["all"]);
        assert_eq!(drain(&mut rx_b), vec!["all"]);
    }

    #[test]
    fn test_leave_room_drops_empty_group() {
        let manager = ConnectionManager::new();
        let (a, _rx) = connect(&manager);

        manager.join_room(a.id(), "room-1");
        assert_eq!(manager.room_size("room-1"), 1);

        assert!(manager.leave_room(a.id(), "room-1"));
        assert!(!manager.leave_room(a.id(), "room-1"));
        assert_eq!(manager.room_count(), 0);
        assert!(!a.in_room("room-1"));
    }

    #[test]
    fn test_remove_connection_detaches_groups() {
        let manager = ConnectionManager::new();
        let (a, _rx_a) = connect(&manager);
        let (b, _rx_b) = connect(&manager);

        manager.join_room(a.id(), "room-1");
        manager.join_room(a.id(), "room-2");
        manager.join_room(b.id(), "room-2");

        manager.remove_connection(a.id());

        assert_eq!(manager.room_size("room-1"), 0);
        assert_eq!(manager.room_size("room-2"), 1);
        assert_eq!(manager.room_count(), 1);
    }

    #[test]
    fn test_join_unknown_connection() {
        let manager = ConnectionManager::new();
        assert!(!manager.join_room("ghost", "room-1"));
        assert_eq!(manager.room_count(), 0);
    }

    #[test]
    fn test_full_buffer_only_affects_that_connection() {
        let manager = ConnectionManager::new();
        let (tx, _slow_rx) = mpsc::channel(1);
        let _slow = manager.add_connection(tx);
        let (_fast, mut fast_rx) = connect(&manager);

        assert_eq!(manager.broadcast(&text("1")), 2);
        assert_eq!(manager.broadcast(&text("2")), 1);
        assert_eq!(drain(&mut fast_rx), vec!["1", "2"]);
    }
}
