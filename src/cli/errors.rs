//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use thiserror::Error;

use crate::auth::AuthError;
use crate::http_server::ConfigError;
use crate::observability::LogError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] LogError),

    #[error("fixtures: {0}")]
    Fixtures(#[from] StoreError),

    #[error("token: {0}")]
    Token(#[from] AuthError),

    #[error("boot failed: {0}")]
    BootFailed(String),
}

impl CliError {
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::BootFailed(msg.into())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
