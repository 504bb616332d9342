//! Server configuration.

use serde::{Deserialize, Serialize};

/// Server-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host to bind to.
    pub host: String,
    /// Log level.
    pub log_level: String,
    /// Reject Stripe signatures older than this many seconds.
    /// Unset means no freshness check, matching the provider scheme
    /// as originally implemented.
    pub stripe_tolerance_secs: Option<i64>,
    /// Seed the default webhook sources at startup.
    pub seed_sources: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            stripe_tolerance_secs: None,
            seed_sources: true,
        }
    }
}

/// Loads configuration from a TOML file.
pub fn load_config(path: &str) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: toml::Value =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let server: ServerConfig = config
        .get("server")
        .map(|v| toml::Value::try_into(v.clone()))
        .transpose()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?
        .unwrap_or_default();

    Ok(server)
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
}
