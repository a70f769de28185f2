//! Stages shared by every endpoint pipeline

pub mod auth;
pub mod validate;

pub use auth::AuthGate;
pub use validate::Validate;
