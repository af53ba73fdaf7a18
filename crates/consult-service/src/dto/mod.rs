//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs

pub mod requests;
pub mod responses;

pub use requests::{
    CreateRoomRequest, ExportDocumentRequest, JoinRoomRequest, LeaveRoomRequest,
    SelectUserRequest, StoreTranscriptRequest,
};

pub use responses::{
    EndRoomResponse, HealthResponse, MessageResponse, RecordingResult, RoomResponse, RoomSession,
    RoomSessionResponse, SelectUserResponse, UsersResponse,
};
