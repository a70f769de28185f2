//! # Auth Module
//!
//! Bearer-token handling for the authorization gate that fronts every
//! endpoint except the health check.

pub mod errors;
pub mod jwt;

pub use errors::{AuthError, AuthResult};
pub use jwt::{JwtConfig, TokenClaims, JwtManager};
