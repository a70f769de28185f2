//! # HTTP Server Module
//!
//! axum router over the endpoint pipelines.
//!
//! # Endpoints
//!
//! - `/health` - Health check (no auth)
//! - `/v2/list` - Timeline
//! - `/post`, `/post/:postId/{share,rating,like,pageview,reply}`
//! - `/community-post`, `/community-post/:communityPostId/{rating,like,pageview,reply}`
//! - `/event-post/:eventPostId/rating`
//! - `/user/:userId` - Public profile

pub mod config;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use server::{bearer_token, HttpServer};
