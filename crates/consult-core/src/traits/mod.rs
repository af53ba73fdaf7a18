//! Collaborator traits (ports)

mod collaborators;

pub use collaborators::{CredentialIssuer, DocumentRenderer, RecordingControl, RenderedDocument};
