//! Individual WebSocket connection

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::protocol::Outbound;

/// A single WebSocket connection
///
/// The handle is an opaque uuid; it is what the user registry binds to a
/// roster user.
pub struct Connection {
    /// Unique connection handle
    id: String,

    /// Channel to the writer task
    sender: mpsc::Sender<Outbound>,

    /// Room groups this connection is attached to
    rooms: Mutex<HashSet<String>>,

    /// Last inbound traffic of any kind
    last_seen: Mutex<Instant>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a connection with a fresh handle
    pub fn new(sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Self::with_id(Uuid::new_v4().to_string(), sender)
    }

    pub fn with_id(id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            id,
            sender,
            rooms: Mutex::new(HashSet::new()),
            last_seen: Mutex::new(now),
            created_at: now,
        })
    }

    /// Get the connection handle
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue a frame without waiting
    ///
    /// A full buffer drops the frame for this connection only.
    pub fn try_send(&self, frame: Outbound) -> bool {
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(connection_id = %self.id, "Outbound buffer full, frame dropped");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(connection_id = %self.id, "Writer closed, frame dropped");
                false
            }
        }
    }

    // === Room groups ===

    pub(crate) fn add_room(&self, room_id: &str) -> bool {
        self.rooms.lock().insert(room_id.to_string())
    }

    pub(crate) fn remove_room(&self, room_id: &str) -> bool {
        self.rooms.lock().remove(room_id)
    }

    pub(crate) fn take_rooms(&self) -> HashSet<String> {
        std::mem::take(&mut *self.rooms.lock())
    }

    /// Room groups this connection is attached to
    pub fn rooms(&self) -> HashSet<String> {
        self.rooms.lock().clone()
    }

    pub fn in_room(&self, room_id: &str) -> bool {
        self.rooms.lock().contains(room_id)
    }

    // === Liveness ===

    /// Record inbound traffic
    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    /// Time since the last inbound traffic
    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("rooms", &self.rooms.lock().len())
            .field("age", &self.age())
            .finish()
    }
}
