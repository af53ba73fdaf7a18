//! Room entity - a bounded consultation session

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::DomainError;

/// Maximum simultaneous participants per room
pub const MAX_PARTICIPANTS: usize = 5;

/// A user's membership in a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub user_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Live consultation room
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "roomId")]
    pub id: String,
    pub room_name: String,
    pub created_by: String,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
    participants: Vec<Participant>,
    pub max_participants: usize,
    pub is_recording: bool,
    pub transcript_data: Option<Value>,
}

impl Room {
    /// Create an empty room
    pub fn new(
        id: impl Into<String>,
        created_by: impl Into<String>,
        created_by_name: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            room_name: Self::room_name_for(&id),
            id,
            created_by: created_by.into(),
            created_by_name: created_by_name.into(),
            created_at: Utc::now(),
            participants: Vec::new(),
            max_participants: MAX_PARTICIPANTS,
            is_recording: false,
            transcript_data: None,
        }
    }

    /// Media-session room name for a room id
    pub fn room_name_for(id: &str) -> String {
        format!("room-{id}")
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Add a participant
    ///
    /// Returns `Ok(false)` when the user is already present (no-op, even if
    /// the room is full). Fails with `RoomFull` before mutating otherwise.
    pub fn add_participant(
        &mut self,
        user_id: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Result<bool, DomainError> {
        let user_id = user_id.into();
        if self.has_participant(&user_id) {
            return Ok(false);
        }
        if self.is_full() {
            return Err(DomainError::RoomFull {
                room_id: self.id.clone(),
                max: self.max_participants,
            });
        }

        self.participants.push(Participant {
            user_id,
            user_name: user_name.into(),
            joined_at: Utc::now(),
        });
        Ok(true)
    }

    /// Remove a participant; returns whether an entry was removed
    pub fn remove_participant(&mut self, user_id: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.user_id != user_id);
        self.participants.len() != before
    }
}
