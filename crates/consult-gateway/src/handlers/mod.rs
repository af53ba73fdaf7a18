//! Client event handlers
//!
//! Each client event maps to one handler. Handlers check the user id
//! against the roster before touching any state.

mod connect;
mod disconnect;
mod error;
mod meeting;
mod room;

pub use connect::ConnectHandler;
pub use disconnect::DisconnectHandler;
pub use error::{HandlerError, HandlerResult};
pub use meeting::MeetingHandler;
pub use room::RoomHandler;

use std::sync::Arc;

use crate::connection::Connection;
use crate::protocol::ClientEvent;
use crate::server::GatewayState;

/// Dispatch incoming client events to the appropriate handler
pub struct EventDispatcher;

impl EventDispatcher {
    /// Handle an incoming client event
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        event: ClientEvent,
    ) -> HandlerResult<()> {
        match event {
            ClientEvent::UserConnect(user_id) => {
                ConnectHandler::handle(state, connection, &user_id).await
            }
            ClientEvent::RoomJoin(membership) => {
                RoomHandler::join(state, connection, membership).await
            }
            ClientEvent::RoomLeave(membership) => {
                RoomHandler::leave(state, connection, membership).await
            }
            ClientEvent::MeetingEnded(ended) => MeetingHandler::ended(state, ended).await,
        }
    }
}
