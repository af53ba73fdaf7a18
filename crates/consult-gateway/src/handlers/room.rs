//! `room:join` and `room:leave` handlers

use std::sync::Arc;

use consult_core::{DomainError, User, UserStatus};

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{Outbound, ParticipantNotice, RoomMembership, ServerEvent};
use crate::server::GatewayState;

/// Moves users in and out of room groups
pub struct RoomHandler;

impl RoomHandler {
    /// Put a user in a meeting and attach the connection to the room group
    ///
    /// The user must have announced itself on this connection. A room that
    /// only exists on the media side is still joinable here and the registry
    /// miss is logged. A full room rejects the event before anything changes.
    pub async fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        membership: RoomMembership,
    ) -> HandlerResult<()> {
        let RoomMembership { user_id, room_id } = membership;
        require_room(&room_id)?;

        let ctx = state.service_context();
        let user = bound_user(state, connection, &user_id)?;

        match ctx.rooms().join(&room_id, &user_id, &user.name) {
            Ok(room) => {
                tracing::debug!(
                    room_id = %room_id,
                    participants = room.participant_count(),
                    "Room membership recorded"
                );
            }
            Err(e @ DomainError::RoomFull { .. }) => return Err(e.into()),
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "Room membership not recorded");
            }
        }

        ctx.users()
            .update_status(&user_id, UserStatus::InMeeting, Some(room_id.clone()))?;
        state
            .connection_manager()
            .join_room(connection.id(), &room_id);

        tracing::info!(user_id = %user_id, room_id = %room_id, "User joined room");

        state.broadcast_roster();
        let notice = Outbound::event(&ServerEvent::RoomUserJoined(ParticipantNotice::from(&user)))?;
        state.connection_manager().send_to_room(&room_id, &notice);
        Ok(())
    }

    /// Take a user out of a meeting and detach the connection from the group
    pub async fn leave(
        state: &GatewayState,
        connection: &Arc<Connection>,
        membership: RoomMembership,
    ) -> HandlerResult<()> {
        let RoomMembership { user_id, room_id } = membership;
        require_room(&room_id)?;

        let ctx = state.service_context();
        let user = bound_user(state, connection, &user_id)?;

        ctx.rooms().leave(&room_id, &user_id);
        ctx.users().update_status(&user_id, UserStatus::Online, None)?;
        state
            .connection_manager()
            .leave_room(connection.id(), &room_id);

        tracing::info!(user_id = %user_id, room_id = %room_id, "User left room");

        state.broadcast_roster();
        let notice = Outbound::event(&ServerEvent::RoomUserLeft(ParticipantNotice::from(&user)))?;
        state.connection_manager().send_to_room(&room_id, &notice);
        Ok(())
    }
}

/// The roster user, provided this connection is the one bound to them
fn bound_user(state: &GatewayState, connection: &Connection, user_id: &str) -> HandlerResult<User> {
    let users = state.service_context().users();
    let user = users.get_by_id(user_id)?;

    if users
        .find_by_connection(connection.id())
        .is_some_and(|bound| bound.id == user.id)
    {
        Ok(user)
    } else {
        Err(HandlerError::InvalidPayload(format!(
            "user {user_id} is not connected on this socket"
        )))
    }
}

fn require_room(room_id: &str) -> HandlerResult<()> {
    if room_id.trim().is_empty() {
        return Err(HandlerError::InvalidPayload("roomId is required".to_string()));
    }
    Ok(())
}
