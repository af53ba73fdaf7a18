//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod context;
pub mod error;
pub mod export;
pub mod room;
pub mod user;

// Re-export all services for convenience
pub use context::{ServiceContext, ServiceContextBuilder, DEFAULT_COLLABORATOR_TIMEOUT};
pub use error::{ServiceError, ServiceResult};
pub use export::ExportService;
pub use room::RoomService;
pub use user::UserService;
