//! Gateway protocol definitions
//!
//! Every frame is a JSON text message `{"event": "<name>", "data": <payload>}`.
//! Inbound frames decode into [`ClientEvent`]; outbound events are encoded
//! once and shared between recipients as [`Outbound`] frames.

mod events;
mod frame;

pub use events::{ClientEvent, MeetingEnded, ParticipantNotice, RoomMembership, ServerEvent};
pub use frame::{Outbound, ProtocolError};
