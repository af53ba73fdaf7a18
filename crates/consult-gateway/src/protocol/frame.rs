//! Outbound frames and protocol errors

use std::sync::Arc;

use thiserror::Error;

use super::ServerEvent;

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A message queued for a connection's writer task
#[derive(Debug, Clone)]
pub enum Outbound {
    /// Pre-encoded event, shared across every recipient of a fan-out
    Text(Arc<str>),
    /// Transport-level liveness probe
    Ping,
}

impl Outbound {
    /// Encode an event once for fan-out
    pub fn event(event: &ServerEvent) -> Result<Self, ProtocolError> {
        Ok(Self::Text(Arc::from(event.encode()?)))
    }
}
