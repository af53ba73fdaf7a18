//! Gateway event types

use consult_core::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::frame::ProtocolError;

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Bind this connection to a roster user
    #[serde(rename = "user:connect")]
    UserConnect(String),

    #[serde(rename = "room:join")]
    RoomJoin(RoomMembership),

    #[serde(rename = "room:leave")]
    RoomLeave(RoomMembership),

    /// Relay the final transcript to everyone still in the room
    #[serde(rename = "meeting:ended")]
    MeetingEnded(MeetingEnded),
}

impl ClientEvent {
    /// Decode a text frame
    ///
    /// Unknown event names and missing required fields are rejected here, so
    /// handlers only ever see well-formed payloads.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserConnect(_) => "user:connect",
            Self::RoomJoin(_) => "room:join",
            Self::RoomLeave(_) => "room:leave",
            Self::MeetingEnded(_) => "meeting:ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMembership {
    pub user_id: String,
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingEnded {
    pub room_id: String,
    /// Opaque transcript record; relayed untouched
    #[serde(default)]
    pub transcript: Value,
}

/// Events the server emits
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full roster, broadcast to every connection
    #[serde(rename = "users:update")]
    UsersUpdate(Vec<User>),

    /// Full roster, sent to a connection right after `user:connect`
    #[serde(rename = "users:list")]
    UsersList(Vec<User>),

    #[serde(rename = "room:user-joined")]
    RoomUserJoined(ParticipantNotice),

    #[serde(rename = "room:user-left")]
    RoomUserLeft(ParticipantNotice),

    #[serde(rename = "transcript:received")]
    TranscriptReceived(Value),
}

impl ServerEvent {
    /// Encode to a text frame
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Who entered or left a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantNotice {
    pub user_id: String,
    pub user_name: String,
}

impl From<&User> for ParticipantNotice {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            user_name: user.name.clone(),
        }
    }
}
