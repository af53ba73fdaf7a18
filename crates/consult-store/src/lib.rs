//! # consult-store
//!
//! In-memory stores for the consultation server.
//!
//! ## Features
//!
//! - **Presence**: roster users, status, and the connection -> user index
//! - **Rooms**: live rooms keyed by slug, with capacity-checked membership
//!
//! Both stores shard their state with `DashMap`, so every operation is atomic
//! per key without a global lock. No method awaits while holding a guard.
//!
//! ## Example
//!
//! ```ignore
//! use consult_store::{RoomRegistry, UserRegistry};
//!
//! let users = UserRegistry::with_clinic_roster();
//! let rooms = RoomRegistry::new();
//!
//! let room = rooms.create("1", "Bác sĩ A");
//! assert_eq!(room.id, "bac-si-a");
//! rooms.join(&room.id, "2", "Bác sĩ B")?;
//! ```

pub mod presence;
pub mod rooms;

pub use presence::UserRegistry;
pub use rooms::RoomRegistry;
