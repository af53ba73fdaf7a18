//! Presence storage module.
//!
//! Tracks roster members, their status, and their live gateway connection.

mod user_registry;

pub use user_registry::UserRegistry;
