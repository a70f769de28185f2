//! # Core Module
//!
//! The handler chain every endpoint is built from: a typed request context,
//! the stage/pipeline abstraction and the stages shared across endpoints.

pub mod context;
pub mod middleware;
pub mod pipeline;

pub use context::{Created, RequestContext, Scope};
pub use middleware::{AuthGate, Validate};
pub use pipeline::{Flow, Pipeline, PipelineBuilder, Responder, Stage, StageFuture};
