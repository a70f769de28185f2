//! Server Configuration
//!
//! JSON configuration file for the HTTP server: bind address, CORS, token
//! settings, logging and the optional fixtures file seeding the store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::JwtConfig;
use crate::observability::{create_env_filter, LogConfig};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub log: LogConfig,

    /// JSON file seeding the store at startup
    #[serde(default)]
    pub fixtures: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            jwt: JwtConfig::default(),
            log: LogConfig::default(),
            fixtures: None,
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load and validate a config file. A relative fixtures path is
    /// resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: ServerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(fixtures) = config.fixtures.take() {
            let resolved = match path.parent() {
                Some(dir) if fixtures.is_relative() => dir.join(fixtures),
                _ => fixtures,
            };
            config.fixtures = Some(resolved);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Invalid("jwt.secret must not be empty".into()));
        }
        if self.jwt.token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "jwt.token_ttl_minutes must be > 0".into(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".into()));
        }
        create_env_filter(&self.log.level).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
