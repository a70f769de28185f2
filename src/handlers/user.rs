//! Public profile read

use std::sync::Arc;

use axum::http::StatusCode;

use crate::api::Envelope;
use crate::core::{Flow, Pipeline, RequestContext, Stage, Validate};
use crate::store::{Store, UserProfile};
use crate::validation::{FieldRules, Schema};

use super::stages::StoreStage;

const GET_USER: &str = "get-user";

pub fn profile_schema() -> Schema {
    Schema::new().params(
        "userId",
        FieldRules::new().is_int("Invalid Resource: User Id"),
    )
}

/// `GET /user/:userId`. Unlike context lookups, a missing profile is the
/// answer itself and ends the request with 404.
pub fn user_profile(auth: Arc<dyn Stage>, store: Arc<dyn Store>) -> Pipeline {
    Pipeline::builder(GET_USER)
        .shared(auth)
        .stage(Validate::fixed(profile_schema()))
        .stage(StoreStage::lookup(store, |store, request, ctx| {
            let found = match request.int("userId") {
                Some(id) => store.find_user(id),
                None => Ok(None),
            };
            match found {
                Ok(Some(user)) => {
                    ctx.scope.profile = Some(user);
                    Flow::Continue
                }
                Ok(None) => Flow::Terminate(Envelope::not_found("Not Found: User")),
                Err(e) => Flow::internal("user.findOne Error - get-user", ctx, &e),
            }
        }))
        .respond(|ctx: &RequestContext| match &ctx.scope.profile {
            Some(user) => Envelope::success(StatusCode::OK).with("user", UserProfile::from(user)),
            None => Envelope::not_found("Not Found: User"),
        })
}
