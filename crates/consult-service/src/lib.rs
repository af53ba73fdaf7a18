//! # consult-service
//!
//! Application layer containing business logic, services, DTOs, and the
//! concrete collaborators (document renderer, recording ledger).

pub mod collaborators;
pub mod dto;
pub mod services;

pub use collaborators::{RecordingLedger, RecordingSession, TextDocumentRenderer};
pub use services::{
    ExportService, RoomService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, UserService,
};
