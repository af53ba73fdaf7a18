//! User entity - a member of the fixed clinic roster

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Clinical role of a roster member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Nurse,
    Specialist,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctor => write!(f, "doctor"),
            Self::Nurse => write!(f, "nurse"),
            Self::Specialist => write!(f, "specialist"),
        }
    }
}

/// User presence status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserStatus {
    /// No live connection
    #[default]
    Offline,
    /// Connected, not in a room
    Online,
    /// Connected and attached to a room
    InMeeting,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "offline"),
            Self::Online => write!(f, "online"),
            Self::InMeeting => write!(f, "in-meeting"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offline" => Ok(Self::Offline),
            "online" => Ok(Self::Online),
            "in-meeting" => Ok(Self::InMeeting),
            _ => Err(DomainError::ValidationError(format!("Invalid status: {s}"))),
        }
    }
}

/// Roster member with live presence
///
/// `current_room` is set exactly when `status` is [`UserStatus::InMeeting`];
/// [`User::set_presence`] is the only mutator for the pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: String,
    status: UserStatus,
    current_room: Option<String>,
    /// Handle of the live gateway connection bound to this user
    #[serde(skip)]
    connection: Option<String>,
}

impl User {
    /// Create an offline user
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: UserRole,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
            avatar: avatar.into(),
            status: UserStatus::Offline,
            current_room: None,
            connection: None,
        }
    }

    #[inline]
    pub fn status(&self) -> UserStatus {
        self.status
    }

    #[inline]
    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    #[inline]
    pub fn connection(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    /// Set status and room together
    ///
    /// Fails without mutating when the pair would break the
    /// `in-meeting <=> room` invariant.
    pub fn set_presence(
        &mut self,
        status: UserStatus,
        room_id: Option<String>,
    ) -> Result<(), DomainError> {
        match (status, room_id.as_deref()) {
            (UserStatus::InMeeting, None) => Err(DomainError::ValidationError(
                "in-meeting status requires a room".to_string(),
            )),
            (UserStatus::InMeeting, Some(_)) | (_, None) => {
                self.status = status;
                self.current_room = room_id;
                Ok(())
            }
            (_, Some(room)) => Err(DomainError::ValidationError(format!(
                "status {status} cannot carry room {room}"
            ))),
        }
    }

    /// Replace the bound connection handle, returning the previous one
    pub fn set_connection(&mut self, handle: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.connection, handle)
    }

    /// Drop connection and presence in one step (transport disconnect)
    pub fn go_offline(&mut self) -> Option<String> {
        self.status = UserStatus::Offline;
        self.current_room = None;
        self.connection.take()
    }

    /// Public profile without presence fields
    pub fn public_profile(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
        }
    }
}

/// Public roster entry (identity selection list)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub avatar: String,
}

/// The fixed clinic roster, in display order
pub fn clinic_roster() -> Vec<User> {
    vec![
        User::new("1", "Bác sĩ A", UserRole::Doctor, "👨‍⚕️"),
        User::new("2", "Bác sĩ B", UserRole::Doctor, "👨‍⚕️"),
        User::new("3", "Điều dưỡng C", UserRole::Nurse, "👩‍⚕️"),
        User::new("4", "Chuyên gia D", UserRole::Specialist, "🧑‍⚕️"),
        User::new("5", "Bác sĩ E", UserRole::Doctor, "👨‍⚕️"),
        User::new("6", "Y tá F", UserRole::Nurse, "👩‍⚕️"),
    ]
}
