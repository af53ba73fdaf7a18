//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub cors: CorsConfig,
    pub collaborators: CollaboratorConfig,
    pub export: ExportConfig,
    pub gateway: GatewayConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP + gateway listener
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Media server (LiveKit-compatible) credentials
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default)]
    pub url: String,
}

impl MediaConfig {
    /// Names of the media variables that are unset or empty
    #[must_use]
    pub fn missing_vars(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.is_empty() {
            missing.push("LIVEKIT_API_KEY");
        }
        if self.api_secret.is_empty() {
            missing.push("LIVEKIT_API_SECRET");
        }
        if self.url.is_empty() {
            missing.push("LIVEKIT_URL");
        }
        missing
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Deployed frontend origin, allowed in addition to the local defaults
    #[serde(default)]
    pub frontend_url: Option<String>,
}

/// Limits for calls to external collaborators
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorConfig {
    #[serde(default = "default_collaborator_timeout_ms")]
    pub timeout_ms: u64,
}

impl CollaboratorConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Document export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

/// Gateway liveness configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_heartbeat_interval_ms")]
    pub heartbeat_interval_ms: u64,
    #[serde(default = "default_heartbeat_timeout_ms")]
    pub heartbeat_timeout_ms: u64,
}

impl GatewayConfig {
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    #[must_use]
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            heartbeat_timeout_ms: default_heartbeat_timeout_ms(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "consult-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_collaborator_timeout_ms() -> u64 {
    10_000
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_heartbeat_interval_ms() -> u64 {
    25_000
}

fn default_heartbeat_timeout_ms() -> u64 {
    60_000
}

/// Parse an optional numeric variable, rejecting garbage instead of ignoring it
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        _ => Ok(None),
    }
}

fn string_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a numeric variable is set but unparseable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: string_var("APP_NAME").unwrap_or_else(default_app_name),
                env: string_var("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: string_var("HOST").unwrap_or_else(default_host),
                port: parse_var("PORT")?.unwrap_or_else(default_port),
            },
            media: MediaConfig {
                api_key: string_var("LIVEKIT_API_KEY").unwrap_or_default(),
                api_secret: string_var("LIVEKIT_API_SECRET").unwrap_or_default(),
                url: string_var("LIVEKIT_URL").unwrap_or_default(),
            },
            cors: CorsConfig {
                frontend_url: string_var("FRONTEND_URL"),
            },
            collaborators: CollaboratorConfig {
                timeout_ms: parse_var("COLLABORATOR_TIMEOUT_MS")?
                    .unwrap_or_else(default_collaborator_timeout_ms),
            },
            export: ExportConfig {
                dir: string_var("EXPORT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_export_dir),
            },
            gateway: GatewayConfig {
                heartbeat_interval_ms: parse_var("GATEWAY_HEARTBEAT_INTERVAL_MS")?
                    .unwrap_or_else(default_heartbeat_interval_ms),
                heartbeat_timeout_ms: parse_var("GATEWAY_HEARTBEAT_TIMEOUT_MS")?
                    .unwrap_or_else(default_heartbeat_timeout_ms),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns an error if a duration is zero or the heartbeat timeout does
    /// not exceed the ping interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collaborators.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "COLLABORATOR_TIMEOUT_MS",
                "0".to_string(),
            ));
        }
        if self.gateway.heartbeat_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_HEARTBEAT_INTERVAL_MS",
                "0".to_string(),
            ));
        }
        if self.gateway.heartbeat_timeout_ms <= self.gateway.heartbeat_interval_ms {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_HEARTBEAT_TIMEOUT_MS",
                format!(
                    "{} (must exceed interval {})",
                    self.gateway.heartbeat_timeout_ms, self.gateway.heartbeat_interval_ms
                ),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: default_env(),
            },
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            media: MediaConfig::default(),
            cors: CorsConfig::default(),
            collaborators: CollaboratorConfig {
                timeout_ms: default_collaborator_timeout_ms(),
            },
            export: ExportConfig {
                dir: default_export_dir(),
            },
            gateway: GatewayConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
