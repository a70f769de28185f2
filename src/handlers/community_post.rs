//! Community posts

use std::sync::Arc;

use axum::http::StatusCode;

use crate::api::Envelope;
use crate::core::{Created, Flow, Pipeline, RequestContext, Stage, Validate};
use crate::store::{NewCommunityPost, Store};
use crate::validation::{FieldRules, Schema};

use super::message_rules;
use super::stages::{caller, StoreStage};

const POST_COMMUNITY_POST: &str = "post-community-post";

pub fn community_post_schema() -> Schema {
    Schema::new().body("message", message_rules()).body(
        "communityId",
        FieldRules::new()
            .optional()
            .is_int("Invalid Resource: Community Id"),
    )
}

/// `POST /community-post`. Without `communityId` the post is personal and
/// shows up on the author's timeline.
pub fn create_community_post(auth: Arc<dyn Stage>, store: Arc<dyn Store>) -> Pipeline {
    Pipeline::builder(POST_COMMUNITY_POST)
        .shared(auth)
        .stage(Validate::fixed(community_post_schema()))
        .stage(StoreStage::execute(store, |store, request, ctx| {
            let user_id = match caller(ctx) {
                Ok(id) => id,
                Err(flow) => return flow,
            };
            let new = NewCommunityPost {
                user_id,
                community_id: request.int("communityId"),
                message: request.text("message"),
            };
            match store.create_community_post(new) {
                Ok(post) => {
                    ctx.scope.created = Some(Created::CommunityPost(post));
                    Flow::Continue
                }
                Err(e) => Flow::internal("communityPost.create Error - post-community-post", ctx, &e),
            }
        }))
        .respond(|ctx: &RequestContext| {
            let envelope = Envelope::success(StatusCode::CREATED);
            match &ctx.scope.created {
                Some(Created::CommunityPost(post)) => envelope.with("communityPost", post),
                _ => envelope,
            }
        })
}
