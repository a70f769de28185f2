//! # Auth Errors
//!
//! Error types for the authorization gate.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication and authorization errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    // ==================
    // Token Errors
    // ==================
    /// No bearer token on the request
    #[error("Missing Resource: Token")]
    MissingToken,

    /// JWT token is malformed
    #[error("Malformed token")]
    MalformedToken,

    /// JWT token has expired
    #[error("Token expired")]
    TokenExpired,

    /// JWT signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    // ==================
    // Identity Errors
    // ==================
    /// Token names a user that does not exist
    #[error("Invalid Resource: Token")]
    UnknownUser,

    /// Account is suspended
    #[error("Account suspended")]
    Suspended,

    // ==================
    // Internal Errors
    // ==================
    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidSignature
            | AuthError::UnknownUser => 401,

            AuthError::Suspended => 403,

            AuthError::TokenGenerationFailed => 500,
        }
    }
}
