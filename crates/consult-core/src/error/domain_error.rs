//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Capacity
    // =========================================================================
    #[error("Room {room_id} is full (max {max} participants)")]
    RoomFull { room_id: String, max: usize },

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error("Upstream error: {0}")]
    UpstreamError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::RoomFull { .. } => "ROOM_FULL",
            Self::UpstreamError(_) => "UPSTREAM_FAILURE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::RoomNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_))
    }

    /// Check if this is a capacity conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RoomFull { .. })
    }

    /// Check if a collaborator failed
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::UpstreamError(_))
    }
}
