//! User service
//!
//! Roster listing and identity selection.

use chrono::Utc;
use consult_core::PublicUser;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{SelectUserRequest, SelectUserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public roster in display order
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> ServiceResult<Vec<PublicUser>> {
        Ok(self.ctx.users().public_roster())
    }

    /// Select an identity from the roster
    ///
    /// There is no authentication; the token is an opaque session marker of
    /// the form `simple-token-<id>-<millis>`.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn select_user(&self, request: SelectUserRequest) -> ServiceResult<SelectUserResponse> {
        request.validate()?;

        let user = self
            .ctx
            .users()
            .get_by_id(&request.user_id)
            .map_err(|_| ServiceError::not_found("User", request.user_id.clone()))?;

        let token = format!("simple-token-{}-{}", user.id, Utc::now().timestamp_millis());
        info!(user_name = %user.name, "User selected");

        Ok(SelectUserResponse {
            user: user.public_profile(),
            token,
        })
    }
}
