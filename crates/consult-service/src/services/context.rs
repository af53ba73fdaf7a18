//! Service context - dependency container for services
//!
//! Holds the in-memory registries and the external collaborators.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use consult_core::{CredentialIssuer, DocumentRenderer, DomainError, RecordingControl};
use consult_store::{RoomRegistry, UserRegistry};

use crate::collaborators::RecordingLedger;

use super::error::{ServiceError, ServiceResult};

/// Default bound on a single collaborator call
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same registries. The HTTP
/// surface and the presence gateway hold clones of one context.
#[derive(Clone)]
pub struct ServiceContext {
    // Stores
    users: Arc<UserRegistry>,
    rooms: Arc<RoomRegistry>,

    // Collaborators
    credentials: Arc<dyn CredentialIssuer>,
    documents: Arc<dyn DocumentRenderer>,
    recording: Arc<dyn RecordingControl>,

    collaborator_timeout: Duration,
    media_url: String,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Stores ===

    /// Get the user registry
    pub fn users(&self) -> &UserRegistry {
        &self.users
    }

    /// Get the room registry
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    // === Collaborators ===

    pub fn credentials(&self) -> &dyn CredentialIssuer {
        self.credentials.as_ref()
    }

    pub fn documents(&self) -> &dyn DocumentRenderer {
        self.documents.as_ref()
    }

    pub fn recording(&self) -> &dyn RecordingControl {
        self.recording.as_ref()
    }

    /// Media server URL handed to clients alongside their credential
    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    pub fn collaborator_timeout(&self) -> Duration {
        self.collaborator_timeout
    }

    /// Await a collaborator call under the configured timeout
    ///
    /// Both expiry and collaborator errors surface as `ServiceError::Upstream`.
    /// Callers must not hold a registry guard across this await.
    pub async fn call_collaborator<T, F>(&self, operation: &'static str, call: F) -> ServiceResult<T>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.collaborator_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "Collaborator call failed");
                Err(ServiceError::upstream(format!("{operation} failed: {e}")))
            }
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.collaborator_timeout.as_millis() as u64,
                    "Collaborator call timed out"
                );
                Err(ServiceError::upstream(format!(
                    "{operation} timed out after {}ms",
                    self.collaborator_timeout.as_millis()
                )))
            }
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("users", &self.users.len())
            .field("rooms", &self.rooms.len())
            .field("collaborators", &"...")
            .field("collaborator_timeout", &self.collaborator_timeout)
            .field("media_url", &self.media_url)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    users: Option<Arc<UserRegistry>>,
    rooms: Option<Arc<RoomRegistry>>,
    credentials: Option<Arc<dyn CredentialIssuer>>,
    documents: Option<Arc<dyn DocumentRenderer>>,
    recording: Option<Arc<dyn RecordingControl>>,
    collaborator_timeout: Duration,
    media_url: String,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            users: None,
            rooms: None,
            credentials: None,
            documents: None,
            recording: None,
            collaborator_timeout: DEFAULT_COLLABORATOR_TIMEOUT,
            media_url: String::new(),
        }
    }

    /// Defaults to the clinic roster
    pub fn users(mut self, users: Arc<UserRegistry>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn rooms(mut self, rooms: Arc<RoomRegistry>) -> Self {
        self.rooms = Some(rooms);
        self
    }

    pub fn credentials(mut self, issuer: Arc<dyn CredentialIssuer>) -> Self {
        self.credentials = Some(issuer);
        self
    }

    pub fn documents(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.documents = Some(renderer);
        self
    }

    /// Defaults to an in-memory [`RecordingLedger`]
    pub fn recording(mut self, recording: Arc<dyn RecordingControl>) -> Self {
        self.recording = Some(recording);
        self
    }

    pub fn collaborator_timeout(mut self, timeout: Duration) -> Self {
        self.collaborator_timeout = timeout;
        self
    }

    pub fn media_url(mut self, url: impl Into<String>) -> Self {
        self.media_url = url.into();
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if a required collaborator is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            users: self
                .users
                .unwrap_or_else(|| Arc::new(UserRegistry::with_clinic_roster())),
            rooms: self.rooms.unwrap_or_default(),
            credentials: self
                .credentials
                .ok_or_else(|| ServiceError::validation("credentials is required"))?,
            documents: self
                .documents
                .ok_or_else(|| ServiceError::validation("documents is required"))?,
            recording: self
                .recording
                .unwrap_or_else(|| Arc::new(RecordingLedger::new())),
            collaborator_timeout: self.collaborator_timeout,
            media_url: self.media_url,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
