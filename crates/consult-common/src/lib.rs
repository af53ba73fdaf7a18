//! # consult-common
//!
//! Shared utilities including configuration, error handling, media credentials, and telemetry.

pub mod config;
pub mod credential;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, CollaboratorConfig, ConfigError, CorsConfig, Environment,
    ExportConfig, GatewayConfig, MediaConfig, ServerConfig,
};
pub use credential::{MediaClaims, MediaTokenIssuer, VideoGrant, DEFAULT_TOKEN_TTL_SECS};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    try_init_tracing_with_config, TracingConfig, TracingError,
};
