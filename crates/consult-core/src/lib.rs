//! # consult-core
//!
//! Domain layer containing users, rooms, slug allocation, and the traits for
//! the external collaborators (media credentials, documents, recording).
//! This crate has zero dependencies on infrastructure (web framework, storage, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    clinic_roster, Participant, PublicUser, Room, User, UserRole, UserStatus, MAX_PARTICIPANTS,
};
pub use error::DomainError;
pub use traits::{CredentialIssuer, DocumentRenderer, RecordingControl, RenderedDocument};
pub use value_objects::{slugify, SlugAllocator};
