//! Handler Pipeline
//!
//! Ordered stages per endpoint followed by a responder:
//! Auth → Validate → [Lookup → Validate]* → Execute → Respond.
//! A stage either continues or terminates the request with exactly one
//! envelope; later stages never run after a termination.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::api::{ApiRequest, Envelope};
use crate::store::StoreError;

use super::context::RequestContext;

/// Outcome of one stage
#[derive(Debug)]
pub enum Flow {
    /// Hand the context to the next stage
    Continue,
    /// Stop and answer with this envelope
    Terminate(Envelope),
}

impl Flow {
    /// Log a store failure under `tag` and terminate with an opaque 500
    pub fn internal(tag: &str, ctx: &RequestContext, err: &StoreError) -> Self {
        tracing::error!(
            request_id = %ctx.request_id,
            operation = ctx.operation,
            err = %err,
            "{}",
            tag
        );
        Flow::Terminate(Envelope::internal_error())
    }
}

/// Boxed future returned by stages
pub type StageFuture<'a> = Pin<Box<dyn Future<Output = Flow> + Send + 'a>>;

/// One step of an endpoint's pipeline
pub trait Stage: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Run the stage, optionally modifying context
    fn run<'a>(&'a self, request: &'a ApiRequest, ctx: &'a mut RequestContext) -> StageFuture<'a>;
}

/// Builds the success envelope from the final context
pub trait Responder: Send + Sync {
    fn respond(&self, ctx: &RequestContext) -> Envelope;
}

impl<F> Responder for F
where
    F: Fn(&RequestContext) -> Envelope + Send + Sync,
{
    fn respond(&self, ctx: &RequestContext) -> Envelope {
        self(ctx)
    }
}

/// Pipeline of one endpoint
pub struct Pipeline {
    operation: &'static str,
    stages: Vec<Arc<dyn Stage>>,
    responder: Arc<dyn Responder>,
}

impl Pipeline {
    /// Start building a pipeline for the named endpoint
    pub fn builder(operation: &'static str) -> PipelineBuilder {
        PipelineBuilder {
            operation,
            stages: Vec::new(),
        }
    }

    /// Run every stage in order, then the responder
    pub async fn handle(&self, request: ApiRequest) -> Envelope {
        let mut ctx = RequestContext::new(self.operation);
        self.handle_with(request, &mut ctx).await
    }

    /// Run with a caller-supplied context
    pub async fn handle_with(&self, request: ApiRequest, ctx: &mut RequestContext) -> Envelope {
        for stage in &self.stages {
            match stage.run(&request, ctx).await {
                Flow::Continue => {
                    tracing::debug!(
                        request_id = %ctx.request_id,
                        operation = self.operation,
                        stage = stage.name(),
                        "stage passed"
                    );
                }
                Flow::Terminate(envelope) => {
                    tracing::info!(
                        request_id = %ctx.request_id,
                        operation = self.operation,
                        stage = stage.name(),
                        http_code = envelope.http_code,
                        elapsed_ms = ctx.elapsed_ms() as u64,
                        "request terminated"
                    );
                    return envelope;
                }
            }
        }

        let envelope = self.responder.respond(ctx);
        tracing::info!(
            request_id = %ctx.request_id,
            operation = self.operation,
            http_code = envelope.http_code,
            elapsed_ms = ctx.elapsed_ms() as u64,
            "request completed"
        );
        envelope
    }

    /// Endpoint name
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for pipeline construction
pub struct PipelineBuilder {
    operation: &'static str,
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    /// Add a stage
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Add a shared stage
    pub fn shared(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Finish with the responder
    pub fn respond(self, responder: impl Responder + 'static) -> Pipeline {
        Pipeline {
            operation: self.operation,
            stages: self.stages,
            responder: Arc::new(responder),
        }
    }
}
