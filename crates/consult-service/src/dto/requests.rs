//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input
//! validation. Missing string fields deserialize as empty and are rejected by
//! validation, so clients get a 400 with a readable message either way.

use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

/// Reject empty or whitespace-only strings
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Identity selection
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectUserRequest {
    #[validate(custom(function = "not_blank", message = "User ID is required"))]
    pub user_id: String,
}

// ============================================================================
// Room Requests
// ============================================================================

/// Create room request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRoomRequest {
    #[validate(custom(function = "not_blank", message = "User ID and name are required"))]
    pub user_id: String,

    #[validate(custom(function = "not_blank", message = "User ID and name are required"))]
    pub user_name: String,
}

/// Join room request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinRoomRequest {
    #[validate(custom(function = "not_blank", message = "Room ID is required"))]
    pub room_id: String,

    #[validate(custom(function = "not_blank", message = "User ID and name are required"))]
    pub user_id: String,

    #[validate(custom(function = "not_blank", message = "User ID and name are required"))]
    pub user_name: String,
}

/// Leave room request (room id comes from the path)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaveRoomRequest {
    #[validate(custom(function = "not_blank", message = "User ID is required"))]
    pub user_id: String,
}

/// Out-of-band transcript upload for a room
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreTranscriptRequest {
    pub transcript: Value,
}

// ============================================================================
// Export Requests
// ============================================================================

/// Document export request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportDocumentRequest {
    pub transcript_data: Value,

    #[validate(length(max = 200, message = "Room ID must be at most 200 characters"))]
    pub room_id: Option<String>,
}
