//! Structured logging
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! JSON or a pretty fmt layer. Handlers log through the `tracing` macros
//! with `request_id` and `operation` fields; store failures are logged at
//! error level under their operation tag.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging errors
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `campushub=debug,tower_http=info`
    #[serde(default = "default_level")]
    pub level: String,

    /// JSON lines when true, human-readable otherwise
    #[serde(default = "default_json")]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: default_json(),
        }
    }
}

impl LogConfig {
    /// Human-readable debug output
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json: false,
        }
    }
}

/// Parse the filter directive of a config
pub fn create_env_filter(level: &str) -> Result<EnvFilter, LogError> {
    EnvFilter::try_new(level).map_err(|e| LogError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter = create_env_filter(&config.level)?;

    if config.json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))?;
    }

    Ok(())
}
