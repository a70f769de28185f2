//! Observability: structured logging through `tracing`

pub mod logger;

pub use logger::{create_env_filter, init_logging, LogConfig, LogError};
