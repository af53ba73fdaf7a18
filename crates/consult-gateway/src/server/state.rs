//! Gateway state
//!
//! Application state for the gateway server.

use std::sync::Arc;

use consult_common::GatewayConfig;
use consult_service::ServiceContext;

use crate::broadcast::RosterBroadcaster;
use crate::connection::ConnectionManager;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server. The service context
/// is the same one the HTTP surface uses.
#[derive(Clone)]
pub struct GatewayState {
    /// Service context with registries and collaborators
    service_context: ServiceContext,
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Sequenced roster publisher
    roster: Arc<RosterBroadcaster>,
    /// Heartbeat settings
    config: Arc<GatewayConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(service_context: ServiceContext, config: GatewayConfig) -> Self {
        Self {
            service_context,
            connection_manager: ConnectionManager::new_shared(),
            roster: Arc::new(RosterBroadcaster::new()),
            config: Arc::new(config),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the roster broadcaster
    pub fn roster(&self) -> &RosterBroadcaster {
        &self.roster
    }

    /// Get the gateway configuration
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Broadcast the current roster, logging instead of failing
    pub fn broadcast_roster(&self) {
        if let Err(e) = self
            .roster
            .publish(self.service_context.users(), &self.connection_manager)
        {
            tracing::error!(error = %e, "Failed to encode roster");
        }
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("config", &self.config)
            .finish()
    }
}
