//! Event broadcasting
//!
//! Distributes roster snapshots to WebSocket connections.

mod roster;

pub use roster::RosterBroadcaster;
