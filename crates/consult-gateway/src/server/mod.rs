//! Gateway server setup
//!
//! Provides the WebSocket route. The process binary mounts it next to the
//! HTTP routes; [`create_app`] serves it on its own.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new().route("/gateway", get(gateway_handler))
}

/// Build a standalone gateway application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
