//! Server setup and initialization
//!
//! Builds the shared service context once and hands clones to both the HTTP
//! routes and the presence gateway, which share one listener.

use std::sync::Arc;

use axum::Router;
use consult_common::{AppConfig, AppError, MediaTokenIssuer};
use consult_gateway::GatewayState;
use consult_service::{ServiceContext, TextDocumentRenderer};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete application: HTTP routes plus the gateway route
pub fn create_app(state: AppState, gateway: GatewayState) -> Router {
    let cors = state.config().cors.clone();
    let api = apply_middleware(create_router(), &cors).with_state(state);

    api.merge(consult_gateway::create_app(gateway))
}

/// Wire the registries and concrete collaborators from configuration
pub fn build_service_context(config: &AppConfig) -> Result<ServiceContext, AppError> {
    let missing = config.media.missing_vars();
    if !missing.is_empty() {
        warn!(
            missing = ?missing,
            "Media server settings incomplete; credential issuance will fail"
        );
    }

    ServiceContext::builder()
        .credentials(Arc::new(MediaTokenIssuer::from_config(&config.media)))
        .documents(Arc::new(TextDocumentRenderer::new(config.export.dir.clone())))
        .collaborator_timeout(config.collaborators.timeout())
        .media_url(config.media.url.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

/// Initialize all dependencies and create both states
pub fn create_states(config: AppConfig) -> Result<(AppState, GatewayState), AppError> {
    let service_context = build_service_context(&config)?;
    let gateway = GatewayState::new(service_context.clone(), config.gateway.clone());

    info!(
        users = service_context.users().len(),
        export_dir = %config.export.dir.display(),
        "Service context ready"
    );

    Ok((AppState::new(service_context, config), gateway))
}

/// Serve until Ctrl-C
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::Config(format!("Failed to read local address: {e}")))?;
    info!("Server listening on http://{addr} (gateway at ws://{addr}/gateway)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();

    let (state, gateway) = create_states(config)?;
    let app = create_app(state, gateway);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    run_server(app, listener).await
}
