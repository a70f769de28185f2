//! Authorization Gate
//!
//! Verifies the bearer token, resolves the caller by primary key and
//! attaches it to the request scope. Requests that fail here never reach
//! validation or business logic.

use std::sync::Arc;

use crate::api::{ApiRequest, Envelope};
use crate::auth::{AuthError, JwtManager};
use crate::core::context::RequestContext;
use crate::core::pipeline::{Flow, Stage, StageFuture};
use crate::store::Store;

/// Authentication stage
pub struct AuthGate {
    jwt: Arc<JwtManager>,
    store: Arc<dyn Store>,
}

impl AuthGate {
    /// Create a new auth gate
    pub fn new(jwt: Arc<JwtManager>, store: Arc<dyn Store>) -> Self {
        Self { jwt, store }
    }

    fn reject(err: AuthError) -> Flow {
        let envelope = match err.status_code() {
            403 => Envelope::forbidden(err.to_string()),
            401 => Envelope::unauthorized(err.to_string()),
            _ => Envelope::internal_error(),
        };
        Flow::Terminate(envelope)
    }
}

impl Stage for AuthGate {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn run<'a>(&'a self, request: &'a ApiRequest, ctx: &'a mut RequestContext) -> StageFuture<'a> {
        Box::pin(async move {
            let token = match request.bearer.as_deref() {
                Some(t) if !t.is_empty() => t,
                _ => return Self::reject(AuthError::MissingToken),
            };

            let user_id = match self.jwt.user_id(token) {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!(request_id = %ctx.request_id, reason = %e, "token rejected");
                    return Self::reject(e);
                }
            };

            let user = match self.store.find_user(user_id) {
                Ok(Some(user)) => user,
                Ok(None) => return Self::reject(AuthError::UnknownUser),
                Err(e) => return Flow::internal("user.findOne Error - is-token-exist", ctx, &e),
            };

            if user.is_suspended {
                return Self::reject(AuthError::Suspended);
            }

            ctx.scope.user = Some(user);
            Flow::Continue
        })
    }
}
