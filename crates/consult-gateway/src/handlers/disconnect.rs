//! Transport disconnect handler

use super::HandlerResult;
use crate::server::GatewayState;

/// Cleans up after a closed connection
pub struct DisconnectHandler;

impl DisconnectHandler {
    /// Release the user bound to `connection_id` (if any), then forget the
    /// connection and its room groups
    ///
    /// Safe to call more than once. A user who already reconnected on a new
    /// handle keeps their presence.
    pub async fn handle(state: &GatewayState, connection_id: &str) -> HandlerResult<()> {
        let released = state
            .service_context()
            .users()
            .release_connection(connection_id);
        state.connection_manager().remove_connection(connection_id);

        if let Some(user) = released {
            tracing::info!(
                connection_id = %connection_id,
                user_id = %user.id,
                "User disconnected"
            );
            state.broadcast_roster();
        } else {
            tracing::debug!(connection_id = %connection_id, "Anonymous connection closed");
        }
        Ok(())
    }
}
