//! campushub - posts, community posts, engagement and timelines
//!
//! Every endpoint is a [`core::Pipeline`]: authorization gate, validation,
//! optional context lookup, one store operation and the response envelope.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod handlers;
pub mod http_server;
pub mod observability;
pub mod store;
pub mod validation;
