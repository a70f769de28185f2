//! Store-backed stages
//!
//! Lookups and creates are synchronous calls against [`Store`]; each one is
//! wrapped as a named pipeline stage so it logs and short-circuits like any
//! other stage.

use std::sync::Arc;

use crate::api::{ApiRequest, Envelope};
use crate::auth::AuthError;
use crate::core::{Flow, RequestContext, Stage, StageFuture};
use crate::store::{RowId, Store};

/// Stage running one store operation
pub struct StoreStage<F> {
    name: &'static str,
    store: Arc<dyn Store>,
    run: F,
}

impl<F> StoreStage<F>
where
    F: Fn(&dyn Store, &ApiRequest, &mut RequestContext) -> Flow + Send + Sync,
{
    /// Context lookup: resolves a referenced row into scope
    pub fn lookup(store: Arc<dyn Store>, run: F) -> Self {
        Self {
            name: "lookup",
            store,
            run,
        }
    }

    /// Business logic: one create or one aggregating read
    pub fn execute(store: Arc<dyn Store>, run: F) -> Self {
        Self {
            name: "execute",
            store,
            run,
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> Stage for StoreStage<F>
where
    F: Fn(&dyn Store, &ApiRequest, &mut RequestContext) -> Flow + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run<'a>(&'a self, request: &'a ApiRequest, ctx: &'a mut RequestContext) -> StageFuture<'a> {
        Box::pin(async move { (self.run)(self.store.as_ref(), request, ctx) })
    }
}

/// Id of the authenticated caller. Only reachable without one when a
/// pipeline was built without the auth gate.
pub fn caller(ctx: &RequestContext) -> Result<RowId, Flow> {
    ctx.user_id().ok_or_else(|| {
        Flow::Terminate(Envelope::unauthorized(AuthError::MissingToken.to_string()))
    })
}
