//! Route definitions
//!
//! HTTP routes grouped by domain and mounted under /api.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{auth, export, health, rooms};
use crate::state::AppState;

/// Create the API router with all HTTP routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api", api_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(room_routes())
        .merge(export_routes())
}

/// Identity selection routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/users", get(auth::list_users))
        .route("/auth/select-user", post(auth::select_user))
}

/// Room lifecycle routes
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms/create", post(rooms::create_room))
        .route("/rooms/join", post(rooms::join_room))
        .route("/rooms/:room_id", get(rooms::get_room))
        .route("/rooms/:room_id/leave", post(rooms::leave_room))
        .route("/rooms/:room_id/end", post(rooms::end_room))
        .route("/rooms/:room_id/transcript", put(rooms::store_transcript))
}

/// Document export routes
fn export_routes() -> Router<AppState> {
    Router::new().route("/export/document", post(export::export_document))
}
