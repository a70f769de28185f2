//! Ratings, likes, pageviews and replies
//!
//! The same four actions exist for every post kind that supports them; one
//! generic pipeline per action is parameterised by [`PostKind`].

use std::sync::Arc;

use axum::http::StatusCode;

use crate::api::{ApiRequest, Envelope};
use crate::core::{Created, Flow, Pipeline, RequestContext, Stage, Validate};
use crate::store::{
    EngagementKind, NewEngagement, NewRating, NewReply, PostKind, RowId, Store, StoreResult,
};
use crate::validation::{FieldError, FieldRules, Schema, Source};

use super::comment_rules;
use super::stages::{caller, StoreStage};

/// Action performed on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Rating,
    Like,
    Pageview,
    Reply,
}

impl Action {
    /// Table suffix, e.g. `Rating` in `eventPostRating`
    pub fn suffix(&self) -> &'static str {
        match self {
            Action::Rating => "Rating",
            Action::Like => EngagementKind::Like.suffix(),
            Action::Pageview => EngagementKind::Pageview.suffix(),
            Action::Reply => "Reply",
        }
    }

    /// Key of the created row in the success envelope
    pub fn resource(&self) -> &'static str {
        match self {
            Action::Rating => "rating",
            Action::Like => "like",
            Action::Pageview => "pageview",
            Action::Reply => "reply",
        }
    }
}

/// Endpoint name, e.g. `post-event-post-rating`
pub fn operation(kind: PostKind, action: Action) -> &'static str {
    match (kind, action) {
        (PostKind::Post, Action::Rating) => "post-post-rating",
        (PostKind::Post, Action::Like) => "post-post-like",
        (PostKind::Post, Action::Pageview) => "post-post-pageview",
        (PostKind::Post, Action::Reply) => "post-post-reply",
        (PostKind::CommunityPost, Action::Rating) => "post-community-post-rating",
        (PostKind::CommunityPost, Action::Like) => "post-community-post-like",
        (PostKind::CommunityPost, Action::Pageview) => "post-community-post-pageview",
        (PostKind::CommunityPost, Action::Reply) => "post-community-post-reply",
        (PostKind::EventPost, Action::Rating) => "post-event-post-rating",
        (PostKind::EventPost, Action::Like) => "post-event-post-like",
        (PostKind::EventPost, Action::Pageview) => "post-event-post-pageview",
        (PostKind::EventPost, Action::Reply) => "post-event-post-reply",
    }
}

/// Route path, e.g. `/event-post/:eventPostId/rating`
pub fn route(kind: PostKind, action: Action) -> String {
    format!(
        "/{}/:{}/{}",
        kind.route_segment(),
        kind.id_param(),
        action.resource()
    )
}

pub fn schema(kind: PostKind, action: Action) -> Schema {
    let schema = Schema::new().params(
        kind.id_param(),
        FieldRules::new().is_int(format!("Invalid Resource: {} Id", kind.label())),
    );

    match action {
        Action::Rating => schema.body(
            "rating",
            FieldRules::new()
                .not_empty("Missing Resource: Rating")
                .is_float("Invalid Resource: Rating"),
        ),
        Action::Reply => schema.body("comment", comment_rules()),
        Action::Like | Action::Pageview => schema,
    }
}

fn insert(
    store: &dyn Store,
    kind: PostKind,
    action: Action,
    post_id: RowId,
    user_id: RowId,
    request: &ApiRequest,
) -> StoreResult<Created> {
    match action {
        Action::Rating => store
            .create_rating(NewRating {
                kind,
                post_id,
                user_id,
                rating: request.float("rating").unwrap_or_default(),
            })
            .map(Created::Rating),
        Action::Like | Action::Pageview => {
            let engagement = if action == Action::Like {
                EngagementKind::Like
            } else {
                EngagementKind::Pageview
            };
            store
                .create_engagement(
                    engagement,
                    NewEngagement {
                        kind,
                        post_id,
                        user_id,
                    },
                )
                .map(Created::Engagement)
        }
        Action::Reply => store
            .create_reply(NewReply {
                kind,
                post_id,
                user_id,
                comment: request.text("comment").unwrap_or_default(),
            })
            .map(Created::Reply),
    }
}

/// `POST /{kind}/:{kind}Id/{action}`
pub fn pipeline(
    kind: PostKind,
    action: Action,
    auth: Arc<dyn Stage>,
    store: Arc<dyn Store>,
) -> Pipeline {
    let op = operation(kind, action);
    let tag = format!("{}{}.create Error - {}", kind.table(), action.suffix(), op);

    Pipeline::builder(op)
        .shared(auth)
        .stage(Validate::fixed(schema(kind, action)))
        .stage(StoreStage::execute(store, move |store, request, ctx| {
            let user_id = match caller(ctx) {
                Ok(id) => id,
                Err(flow) => return flow,
            };
            let Some(post_id) = request.int(kind.id_param()) else {
                return Flow::Terminate(Envelope::validation_error(vec![FieldError::new(
                    Source::Params,
                    kind.id_param(),
                    format!("Invalid Resource: {} Id", kind.label()),
                    request.param(kind.id_param()).cloned(),
                )]));
            };

            match insert(store, kind, action, post_id, user_id, request) {
                Ok(created) => {
                    ctx.scope.created = Some(created);
                    Flow::Continue
                }
                Err(e) => Flow::internal(&tag, ctx, &e),
            }
        }))
        .respond(move |ctx: &RequestContext| {
            let envelope = Envelope::success(StatusCode::CREATED);
            match &ctx.scope.created {
                Some(Created::Rating(row)) => envelope.with(action.resource(), row),
                Some(Created::Engagement(row)) => envelope.with(action.resource(), row),
                Some(Created::Reply(row)) => envelope.with(action.resource(), row),
                _ => envelope,
            }
        })
}
