//! Room service
//!
//! Room lifecycle: create, join, leave, end, and transcript relay. Requests
//! are validated before any registry mutation. Credential issuance happens
//! after the registry call returns, so no registry guard is held while the
//! collaborator runs. If issuance fails the room (or membership) stays in
//! place; callers can retry the join.

use consult_core::Room;
use serde_json::Value;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    CreateRoomRequest, EndRoomResponse, JoinRoomRequest, LeaveRoomRequest, RecordingResult,
    RoomSession,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Room service
pub struct RoomService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoomService<'a> {
    /// Create a new RoomService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a room named after the creator and issue their credential
    ///
    /// The creator is not added as a participant; they join like anyone else.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn create_room(&self, request: CreateRoomRequest) -> ServiceResult<RoomSession> {
        request.validate()?;

        let room = self.ctx.rooms().create(&request.user_id, &request.user_name);
        let token = self
            .issue_credential(&room.room_name, &request.user_id, &request.user_name)
            .await?;

        info!(room_id = %room.id, "Room ready");
        Ok(RoomSession {
            room_id: room.id,
            room_name: room.room_name,
            token,
            media_url: self.ctx.media_url().to_string(),
            participants: None,
        })
    }

    /// Join an existing room and issue a credential
    ///
    /// Joining a room the user is already in is a no-op for membership but
    /// still issues a fresh credential.
    #[instrument(skip(self, request), fields(room_id = %request.room_id, user_id = %request.user_id))]
    pub async fn join_room(&self, request: JoinRoomRequest) -> ServiceResult<RoomSession> {
        request.validate()?;

        let room = self
            .ctx
            .rooms()
            .join(&request.room_id, &request.user_id, &request.user_name)?;
        let token = self
            .issue_credential(&room.room_name, &request.user_id, &request.user_name)
            .await?;

        info!(participants = room.participant_count(), "User joined room");
        Ok(RoomSession {
            room_id: room.id.clone(),
            room_name: room.room_name.clone(),
            token,
            media_url: self.ctx.media_url().to_string(),
            participants: Some(room.participants().to_vec()),
        })
    }

    /// Leave a room
    ///
    /// Always succeeds for a valid request: leaving a room you are not in,
    /// or one that no longer exists, is acknowledged.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn leave_room(&self, room_id: &str, request: LeaveRoomRequest) -> ServiceResult<()> {
        request.validate()?;

        if self.ctx.rooms().leave(room_id, &request.user_id) {
            info!(room_id = %room_id, "User left room");
        }
        Ok(())
    }

    /// End a room: delete it and stop its recording
    ///
    /// A recording failure is reported in the response but never keeps the
    /// room alive.
    #[instrument(skip(self))]
    pub async fn end_room(&self, room_id: &str) -> ServiceResult<EndRoomResponse> {
        let room = self.ctx.rooms().remove(room_id)?;

        let recording = match self
            .ctx
            .call_collaborator("recording stop", self.ctx.recording().stop(&room.id))
            .await
        {
            Ok(stopped) => RecordingResult {
                stopped,
                error: None,
            },
            Err(e) => {
                warn!(room_id = %room.id, error = %e, "Recording stop failed; room removed anyway");
                RecordingResult {
                    stopped: false,
                    error: Some(e.to_string()),
                }
            }
        };

        info!(
            room_id = %room.id,
            participants = room.participant_count(),
            "Meeting ended"
        );
        Ok(EndRoomResponse {
            message: "Meeting ended successfully".to_string(),
            recording,
        })
    }

    /// Get a room snapshot
    #[instrument(skip(self))]
    pub async fn get_room(&self, room_id: &str) -> ServiceResult<Room> {
        Ok(self.ctx.rooms().get(room_id)?)
    }

    /// Attach a transcript record to a live room
    #[instrument(skip(self, transcript))]
    pub async fn store_transcript(&self, room_id: &str, transcript: Value) -> ServiceResult<Room> {
        if transcript.is_null() {
            return Err(ServiceError::validation("Transcript data is required"));
        }

        let room = self.ctx.rooms().attach_transcript(room_id, transcript)?;
        info!(room_id = %room_id, "Transcript stored");
        Ok(room)
    }

    async fn issue_credential(
        &self,
        room_name: &str,
        user_id: &str,
        user_name: &str,
    ) -> ServiceResult<String> {
        self.ctx
            .call_collaborator(
                "credential issuance",
                self.ctx.credentials().issue(room_name, user_id, user_name),
            )
            .await
    }
}
