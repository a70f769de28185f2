//! # Timeline
//!
//! `GET /v2/list` reads personal posts and personal community posts with
//! their aggregates, each paged independently, then merges them newest
//! first. The page size is half the requested `limit` (5 when unset); this
//! matches the deployed clients and is kept as is.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::api::{ApiRequest, Envelope};
use crate::core::{Flow, Pipeline, RequestContext, Stage, Validate};
use crate::store::{merge_timeline, RowId, Store, TimelineQuery};
use crate::validation::{FieldRules, Schema};

use super::stages::{caller, StoreStage};

const GET_POST: &str = "get-post";

/// Rows per source when `limit` is not given
pub const DEFAULT_PAGE: usize = 5;

pub fn timeline_schema() -> Schema {
    Schema::new()
        .query(
            "offset",
            FieldRules::new().optional().is_int("Invalid Resource: Offset"),
        )
        .query(
            "limit",
            FieldRules::new().optional().is_int("Invalid Resource: Limit"),
        )
}

/// Offset and per-source page size for the caller
pub fn page(request: &ApiRequest, user_id: RowId) -> TimelineQuery {
    let offset = request.int("offset").unwrap_or(0).max(0) as usize;
    let limit = match request.int("limit") {
        None => DEFAULT_PAGE,
        Some(limit) => (limit / 2).max(0) as usize,
    };
    TimelineQuery {
        user_id,
        offset,
        limit,
    }
}

/// `GET /v2/list`
pub fn timeline(auth: Arc<dyn Stage>, store: Arc<dyn Store>) -> Pipeline {
    Pipeline::builder(GET_POST)
        .shared(auth)
        .stage(Validate::fixed(timeline_schema()))
        .stage(
            StoreStage::execute(store.clone(), |store, request, ctx| {
                let query = match caller(ctx) {
                    Ok(id) => page(request, id),
                    Err(flow) => return flow,
                };
                match store.list_posts(&query) {
                    Ok(posts) => {
                        ctx.scope.posts = posts;
                        Flow::Continue
                    }
                    Err(e) => Flow::internal("post.findAll Error - get-post", ctx, &e),
                }
            })
            .named("posts"),
        )
        .stage(
            StoreStage::execute(store, |store, request, ctx| {
                let query = match caller(ctx) {
                    Ok(id) => page(request, id),
                    Err(flow) => return flow,
                };
                match store.list_community_posts(&query) {
                    Ok(posts) => {
                        ctx.scope.community_posts = posts;
                        Flow::Continue
                    }
                    Err(e) => Flow::internal(
                        "communityPost.findAll Error - get-community-posts",
                        ctx,
                        &e,
                    ),
                }
            })
            .named("community-posts"),
        )
        .respond(|ctx: &RequestContext| {
            let posts = merge_timeline(ctx.scope.posts.clone(), ctx.scope.community_posts.clone());
            Envelope::success(StatusCode::OK).with("posts", posts)
        })
}
