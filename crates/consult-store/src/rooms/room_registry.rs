//! Room registry - live rooms keyed by slug.

use std::collections::HashSet;

use consult_core::{DomainError, Room, SlugAllocator};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;

/// Concurrent store of live rooms
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    slugs: SlugAllocator,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty room with a slug derived from the creator's name
    ///
    /// Each candidate slug is claimed through the map entry, so concurrent
    /// creates with the same name never share an id.
    pub fn create(&self, user_id: &str, user_name: &str) -> Room {
        let mut created = None;
        let id = self.slugs.allocate_with(user_name, |candidate| {
            match self.rooms.entry(candidate.to_string()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    let room = Room::new(candidate, user_id, user_name);
                    created = Some(room.clone());
                    slot.insert(room);
                    true
                }
            }
        });

        tracing::info!(room_id = %id, created_by = %user_id, "Room created");
        created.unwrap_or_else(|| Room::new(id, user_id, user_name))
    }

    /// Add a participant; a user already in the room is a no-op
    pub fn join(&self, room_id: &str, user_id: &str, user_name: &str) -> Result<Room, DomainError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()))?;

        if room.add_participant(user_id, user_name)? {
            tracing::debug!(
                room_id = %room_id,
                user_id = %user_id,
                participants = room.participant_count(),
                "Participant joined"
            );
        }
        Ok(room.clone())
    }

    /// Remove a participant
    ///
    /// Never fails: an unknown room or absent user is a no-op. Returns
    /// whether a participant was removed.
    pub fn leave(&self, room_id: &str, user_id: &str) -> bool {
        let removed = self
            .rooms
            .get_mut(room_id)
            .is_some_and(|mut room| room.remove_participant(user_id));

        if removed {
            tracing::debug!(room_id = %room_id, user_id = %user_id, "Participant left");
        }
        removed
    }

    /// Delete a room, returning its final state
    pub fn remove(&self, room_id: &str) -> Result<Room, DomainError> {
        self.rooms
            .remove(room_id)
            .map(|(_, room)| room)
            .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()))
    }

    /// Snapshot of a room
    pub fn get(&self, room_id: &str) -> Result<Room, DomainError> {
        self.rooms
            .get(room_id)
            .map(|room| room.clone())
            .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()))
    }

    /// Store an opaque transcript record on a room
    pub fn attach_transcript(&self, room_id: &str, transcript: Value) -> Result<Room, DomainError> {
        let mut room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| DomainError::RoomNotFound(room_id.to_string()))?;
        room.transcript_data = Some(transcript);
        Ok(room.clone())
    }

    /// Ids of all live rooms
    pub fn ids(&self) -> HashSet<String> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
