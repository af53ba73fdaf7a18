//! User registry - roster members with live presence.
//!
//! Users are materialized once from the roster and never added or removed.
//! Each user sits behind its own map entry, so status and connection updates
//! are atomic per user. A secondary `connection -> user id` index answers
//! reverse lookups for the gateway.
//!
//! Lock order is always user entry, then index entry. Code that reads the
//! index first copies the user id out and drops the index guard before
//! touching the user map.

use consult_core::{clinic_roster, DomainError, PublicUser, User, UserStatus};
use dashmap::DashMap;

/// Concurrent store of roster users
#[derive(Debug)]
pub struct UserRegistry {
    users: DashMap<String, User>,
    /// Roster display order
    order: Vec<String>,
    by_connection: DashMap<String, String>,
}

impl UserRegistry {
    /// Build a registry from a roster; later duplicates of an id are ignored
    pub fn new(roster: Vec<User>) -> Self {
        let users = DashMap::with_capacity(roster.len());
        let mut order = Vec::with_capacity(roster.len());

        for user in roster {
            if users.contains_key(&user.id) {
                tracing::warn!(user_id = %user.id, "Duplicate roster entry ignored");
                continue;
            }
            order.push(user.id.clone());
            users.insert(user.id.clone(), user);
        }

        Self {
            users,
            order,
            by_connection: DashMap::new(),
        }
    }

    /// Registry seeded with the fixed clinic roster
    pub fn with_clinic_roster() -> Self {
        Self::new(clinic_roster())
    }

    /// Get a user by id
    pub fn get_by_id(&self, id: &str) -> Result<User, DomainError> {
        self.users
            .get(id)
            .map(|user| user.clone())
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))
    }

    /// Check whether an id belongs to the roster
    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    /// All users in roster order
    pub fn get_all(&self) -> Vec<User> {
        self.order
            .iter()
            .filter_map(|id| self.users.get(id).map(|user| user.clone()))
            .collect()
    }

    /// Public profiles in roster order
    pub fn public_roster(&self) -> Vec<PublicUser> {
        self.order
            .iter()
            .filter_map(|id| self.users.get(id).map(|user| user.public_profile()))
            .collect()
    }

    /// Set status and current room together
    pub fn update_status(
        &self,
        id: &str,
        status: UserStatus,
        room_id: Option<String>,
    ) -> Result<User, DomainError> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::UserNotFound(id.to_string()))?;
        user.set_presence(status, room_id)?;

        tracing::debug!(
            user_id = %id,
            status = %user.status(),
            room_id = ?user.current_room(),
            "User status updated"
        );
        Ok(user.clone())
    }

    /// Bind (or with `None`, unbind) a user's connection handle
    ///
    /// A handle maps to at most one user: if another user held `handle`, that
    /// user loses the connection and goes offline.
    pub fn bind_connection(&self, id: &str, handle: Option<String>) -> Result<User, DomainError> {
        let (user, displaced) = {
            let mut user = self
                .users
                .get_mut(id)
                .ok_or_else(|| DomainError::UserNotFound(id.to_string()))?;

            let previous = user.set_connection(handle.clone());
            if let Some(previous) = previous.filter(|p| Some(p) != handle.as_ref()) {
                self.by_connection.remove_if(&previous, |_, owner| owner == id);
            }

            let displaced = handle
                .as_ref()
                .and_then(|h| self.by_connection.insert(h.clone(), id.to_string()))
                .filter(|owner| owner != id);

            (user.clone(), displaced)
        };

        // The user guard is released; fix up the previous owner separately
        if let (Some(other), Some(handle)) = (displaced, handle.as_deref()) {
            if let Some(mut other_user) = self.users.get_mut(&other) {
                let reclaimed = self
                    .by_connection
                    .get(handle)
                    .is_some_and(|owner| *owner == other);
                if other_user.connection() == Some(handle) && !reclaimed {
                    other_user.go_offline();
                    tracing::info!(
                        user_id = %other,
                        new_owner = %id,
                        "Connection rebound to another user"
                    );
                }
            }
        }

        Ok(user)
    }

    /// Find the user bound to a connection handle
    pub fn find_by_connection(&self, handle: &str) -> Option<User> {
        let id = self.by_connection.get(handle).map(|owner| owner.clone())?;
        self.users
            .get(&id)
            .filter(|user| user.connection() == Some(handle))
            .map(|user| user.clone())
    }

    /// Release a closed connection
    ///
    /// Only acts if the user is still bound to `handle`; a user that has
    /// since reconnected on another handle is left alone. On success the user
    /// is offline with no room and no connection.
    pub fn release_connection(&self, handle: &str) -> Option<User> {
        let id = self.by_connection.get(handle).map(|owner| owner.clone())?;

        let mut user = self.users.get_mut(&id)?;
        if user.connection() != Some(handle) {
            return None;
        }
        user.go_offline();
        self.by_connection.remove_if(handle, |_, owner| *owner == id);

        Some(user.clone())
    }

    /// Number of roster users
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of users with a live connection
    pub fn connected_count(&self) -> usize {
        self.by_connection.len()
    }
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::with_clinic_roster()
    }
}
