//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CollaboratorConfig, ConfigError, CorsConfig, Environment,
    ExportConfig, GatewayConfig, MediaConfig, ServerConfig,
};
