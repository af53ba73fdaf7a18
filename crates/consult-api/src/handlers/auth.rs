//! Identity selection handlers
//!
//! There is no real authentication: clients pick a roster member.

use axum::extract::State;
use consult_service::dto::{SelectUserRequest, SelectUserResponse, UsersResponse};
use consult_service::UserService;

use crate::extractors::ValidatedJson;
use crate::response::{ApiJson, ApiResult};
use crate::state::AppState;

/// List the public roster
///
/// GET /api/auth/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<ApiJson<UsersResponse>> {
    let service = UserService::new(state.service_context());
    let users = service.list_users().await?;
    Ok(ApiJson(UsersResponse { users }))
}

/// Select the roster member to act as
///
/// POST /api/auth/select-user
pub async fn select_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SelectUserRequest>,
) -> ApiResult<ApiJson<SelectUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.select_user(request).await?;
    Ok(ApiJson(response))
}
