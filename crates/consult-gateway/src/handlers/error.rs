//! Handler error types

use consult_core::DomainError;
use thiserror::Error;

use crate::protocol::ProtocolError;

/// Handler error type
///
/// Handler errors never close the connection; the socket loop logs them and
/// keeps reading.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Invalid payload received
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Domain error (from registries)
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),

    /// Encoding an outbound event failed
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl HandlerError {
    /// Whether the client sent something wrong, as opposed to a server fault
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidPayload(_) => true,
            Self::DomainError(e) => e.is_not_found() || e.is_validation() || e.is_conflict(),
            Self::Protocol(_) => false,
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
