//! Recording ledger
//!
//! Tracks which rooms have an active recording. Media capture itself happens
//! in the clients; the server only keeps the start/stop bookkeeping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use consult_core::{DomainError, RecordingControl};
use dashmap::DashMap;
use serde::Serialize;

/// One recording of a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    pub room_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl RecordingSession {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }
}

/// In-memory recording ledger
#[derive(Debug, Default)]
pub struct RecordingLedger {
    sessions: DashMap<String, RecordingSession>,
}

impl RecordingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) recording a room
    pub fn start(&self, room_id: &str) -> RecordingSession {
        let session = RecordingSession {
            room_id: room_id.to_string(),
            started_at: Utc::now(),
            ended_at: None,
        };
        self.sessions.insert(room_id.to_string(), session.clone());
        tracing::info!(room_id = %room_id, "Recording started");
        session
    }

    pub fn get(&self, room_id: &str) -> Option<RecordingSession> {
        self.sessions.get(room_id).map(|s| s.clone())
    }

    pub fn is_recording(&self, room_id: &str) -> bool {
        self.sessions.get(room_id).is_some_and(|s| s.is_active())
    }
}

#[async_trait]
impl RecordingControl for RecordingLedger {
    async fn stop(&self, room_id: &str) -> Result<bool, DomainError> {
        let Some(mut session) = self.sessions.get_mut(room_id) else {
            tracing::debug!(room_id = %room_id, "No recording to stop");
            return Ok(false);
        };
        if !session.is_active() {
            return Ok(false);
        }

        session.ended_at = Some(Utc::now());
        tracing::info!(room_id = %room_id, "Recording stopped");
        Ok(true)
    }
}
