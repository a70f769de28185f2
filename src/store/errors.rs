//! # Store Errors
//!
//! Failures surfaced by the data access layer. Handlers never forward these
//! to callers; they are logged and turned into an internal-error envelope.

use thiserror::Error;

use super::models::RowId;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Data access errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// Insert referenced a row that does not exist
    #[error("foreign key violation: {table}.{column} = {value} has no matching row")]
    ForeignKey {
        table: &'static str,
        column: &'static str,
        value: RowId,
    },

    /// Insert collided with an existing primary key
    #[error("duplicate key: {table}.id = {id}")]
    DuplicateKey { table: &'static str, id: RowId },

    /// Backend could not serve the request (lock poisoned, injected fault)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Seed data could not be read or parsed
    #[error("invalid fixtures: {0}")]
    Fixtures(String),
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Fixtures(e.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Fixtures(e.to_string())
    }
}
