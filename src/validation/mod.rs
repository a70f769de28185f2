//! # Validation Layer
//!
//! Per-endpoint schemas over route params, query string and body. Schemas
//! are plain values built by functions, so a schema can depend on context
//! resolved earlier in the pipeline.

mod errors;
mod rules;
mod schema;

pub use errors::FieldError;
pub use rules::{value_text, Rule};
pub use schema::{FieldRules, Schema, Source};
