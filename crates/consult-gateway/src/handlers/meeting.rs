//! `meeting:ended` handler

use super::HandlerResult;
use crate::protocol::{MeetingEnded, Outbound, ServerEvent};
use crate::server::GatewayState;

/// Relays a finished meeting's transcript to the room group
pub struct MeetingHandler;

impl MeetingHandler {
    pub async fn ended(state: &GatewayState, ended: MeetingEnded) -> HandlerResult<()> {
        let MeetingEnded { room_id, transcript } = ended;

        let frame = Outbound::event(&ServerEvent::TranscriptReceived(transcript))?;
        let sent = state.connection_manager().send_to_room(&room_id, &frame);

        tracing::info!(room_id = %room_id, recipients = sent, "Transcript relayed");
        Ok(())
    }
}
