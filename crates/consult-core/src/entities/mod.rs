//! Domain entities - core business objects

mod room;
mod user;

pub use room::{Participant, Room, MAX_PARTICIPANTS};
pub use user::{clinic_roster, PublicUser, User, UserRole, UserStatus};
