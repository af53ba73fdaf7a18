//! Response DTOs for API endpoints
//!
//! Bodies are wrapped by the API layer in `{ "success": true, ... }`, so each
//! struct here names the top-level keys next to `success`.

use chrono::{DateTime, Utc};
use consult_core::{Participant, PublicUser, Room};
use serde::Serialize;

// ============================================================================
// Auth Responses
// ============================================================================

/// Public roster
#[derive(Debug, Clone, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

/// Identity selection result
#[derive(Debug, Clone, Serialize)]
pub struct SelectUserResponse {
    pub user: PublicUser,
    pub token: String,
}

// ============================================================================
// Room Responses
// ============================================================================

/// Everything a client needs to enter the media session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSession {
    pub room_id: String,
    pub room_name: String,
    pub token: String,
    pub media_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<Participant>>,
}

/// Create / join result
#[derive(Debug, Clone, Serialize)]
pub struct RoomSessionResponse {
    pub room: RoomSession,
}

/// Room snapshot
#[derive(Debug, Clone, Serialize)]
pub struct RoomResponse {
    pub room: Room,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of stopping a room's recording
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResult {
    /// An active recording was stopped
    pub stopped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// End room result
#[derive(Debug, Clone, Serialize)]
pub struct EndRoomResponse {
    pub message: String,
    pub recording: RecordingResult,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Consultation server is running".to_string(),
            timestamp: Utc::now(),
        }
    }
}
