//! Validation Stage
//!
//! Builds the endpoint's schema from the current context, evaluates it and
//! terminates with a 400 listing every failure. Building the schema per
//! request lets a later validation depend on an earlier lookup.

use crate::api::{ApiRequest, Envelope};
use crate::core::context::RequestContext;
use crate::core::pipeline::{Flow, Stage, StageFuture};
use crate::validation::Schema;

type SchemaFn = Box<dyn Fn(&RequestContext) -> Schema + Send + Sync>;

/// Schema validation stage
pub struct Validate {
    name: &'static str,
    schema: SchemaFn,
}

impl Validate {
    /// Validate against a schema built from context
    pub fn new(schema: impl Fn(&RequestContext) -> Schema + Send + Sync + 'static) -> Self {
        Self {
            name: "validate",
            schema: Box::new(schema),
        }
    }

    /// Validate against a fixed schema
    pub fn fixed(schema: Schema) -> Self {
        Self::new(move |_: &RequestContext| schema.clone())
    }

    /// Rename the stage (e.g. `validate-with-context`)
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl Stage for Validate {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run<'a>(&'a self, request: &'a ApiRequest, ctx: &'a mut RequestContext) -> StageFuture<'a> {
        Box::pin(async move {
            let schema = (self.schema)(ctx);
            let errors = schema.validate(request);
            if errors.is_empty() {
                Flow::Continue
            } else {
                Flow::Terminate(Envelope::validation_error(errors))
            }
        })
    }
}
