//! Collaborator traits (ports) - external capabilities the core calls out to
//!
//! The domain layer defines what it needs; the service layer wires concrete
//! implementations. Calls through these traits may take real time and are
//! always made without holding a registry guard.

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::error::DomainError;

// ============================================================================
// Media credentials
// ============================================================================

/// Mints opaque media-session join credentials
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Issue a credential for `participant_id` to join `room_name`
    async fn issue(
        &self,
        room_name: &str,
        participant_id: &str,
        participant_name: &str,
    ) -> Result<String, DomainError>;
}

// ============================================================================
// Document rendering
// ============================================================================

/// A rendered document on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub file_path: PathBuf,
    pub file_name: String,
}

/// Renders a transcript record into a downloadable document
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, transcript: &Value, room_id: &str)
        -> Result<RenderedDocument, DomainError>;
}

// ============================================================================
// Recording
// ============================================================================

/// Stops media recording when a room ends
#[async_trait]
pub trait RecordingControl: Send + Sync {
    /// Returns whether an active recording was stopped
    async fn stop(&self, room_id: &str) -> Result<bool, DomainError>;
}
