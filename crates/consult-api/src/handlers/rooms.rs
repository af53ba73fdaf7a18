//! Room handlers
//!
//! Endpoints for the room lifecycle: create, join, leave, end, lookup, and
//! transcript upload.

use axum::extract::{Path, State};
use consult_service::dto::{
    CreateRoomRequest, EndRoomResponse, JoinRoomRequest, LeaveRoomRequest, MessageResponse,
    RoomResponse, RoomSessionResponse, StoreTranscriptRequest,
};
use consult_service::RoomService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiJson, ApiResult};
use crate::state::AppState;

/// Create a room and get the creator's media credential
///
/// POST /api/rooms/create
pub async fn create_room(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<ApiJson<RoomSessionResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.create_room(request).await?;
    Ok(ApiJson(RoomSessionResponse { room }))
}

/// Join a room and get a media credential
///
/// POST /api/rooms/join
pub async fn join_room(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<JoinRoomRequest>,
) -> ApiResult<ApiJson<RoomSessionResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.join_room(request).await?;
    Ok(ApiJson(RoomSessionResponse { room }))
}

/// Leave a room
///
/// POST /api/rooms/:room_id/leave
pub async fn leave_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ValidatedJson(request): ValidatedJson<LeaveRoomRequest>,
) -> ApiResult<ApiJson<MessageResponse>> {
    let service = RoomService::new(state.service_context());
    service.leave_room(&room_id, request).await?;
    Ok(ApiJson(MessageResponse::new("Left room successfully")))
}

/// End a room and stop its recording
///
/// POST /api/rooms/:room_id/end
pub async fn end_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> ApiResult<ApiJson<EndRoomResponse>> {
    let service = RoomService::new(state.service_context());
    let response = service.end_room(&room_id).await?;
    Ok(ApiJson(response))
}

/// Get a room snapshot
///
/// GET /api/rooms/:room_id
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> ApiResult<ApiJson<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.get_room(&room_id).await?;
    Ok(ApiJson(RoomResponse { room }))
}

/// Store a transcript record on a live room
///
/// PUT /api/rooms/:room_id/transcript
pub async fn store_transcript(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    ValidatedJson(request): ValidatedJson<StoreTranscriptRequest>,
) -> ApiResult<ApiJson<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let room = service.store_transcript(&room_id, request.transcript).await?;
    Ok(ApiJson(RoomResponse { room }))
}
