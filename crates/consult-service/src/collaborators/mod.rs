//! Concrete implementations of the core collaborator traits

mod document;
mod recording;

pub use document::TextDocumentRenderer;
pub use recording::{RecordingLedger, RecordingSession};
