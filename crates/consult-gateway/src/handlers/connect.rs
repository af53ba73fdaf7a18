//! `user:connect` handler

use std::sync::Arc;

use consult_core::UserStatus;

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;

/// Binds a connection to a roster user and marks them online
pub struct ConnectHandler;

impl ConnectHandler {
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        user_id: &str,
    ) -> HandlerResult<()> {
        let users = state.service_context().users();
        users.get_by_id(user_id)?;

        users.bind_connection(user_id, Some(connection.id().to_string()))?;
        let user = users.update_status(user_id, UserStatus::Online, None)?;

        tracing::info!(
            connection_id = %connection.id(),
            user_id = %user.id,
            user_name = %user.name,
            "User connected"
        );

        state
            .roster()
            .publish_with_list(users, state.connection_manager(), connection)?;
        Ok(())
    }
}
