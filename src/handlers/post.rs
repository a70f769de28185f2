//! Personal posts: create and share

use std::sync::Arc;

use axum::http::StatusCode;

use crate::api::Envelope;
use crate::core::{Created, Flow, Pipeline, RequestContext, Stage, Validate};
use crate::store::{NewPost, Store};
use crate::validation::{FieldRules, Schema};

use super::stages::{caller, StoreStage};
use super::{message_rules, optional_message_rules};

const POST_POST: &str = "post-post";
const POST_SHARE: &str = "post-share";

/// Fields required regardless of category
pub fn post_schema() -> Schema {
    Schema::new()
        .body(
            "postCategoryId",
            FieldRules::new()
                .not_empty("Missing Resource: Post Category Id")
                .is_int("Invalid Resource: Post Category Id"),
        )
        .body("message", message_rules())
        .body(
            "postTo",
            FieldRules::new().optional().is_int("Invalid Resource: Post To"),
        )
}

/// Full schema once the category is known. Stories additionally require a
/// title.
pub fn post_context_schema(ctx: &RequestContext) -> Schema {
    let schema = post_schema();
    match &ctx.scope.post_category {
        Some(category) if category.is_story() => schema.body(
            "title",
            FieldRules::new().not_empty("Missing Resource: Title"),
        ),
        _ => schema,
    }
}

/// `POST /post`
///
/// The category is looked up before validation so a story's missing title
/// is reported together with every other failing field.
pub fn create_post(auth: Arc<dyn Stage>, store: Arc<dyn Store>) -> Pipeline {
    Pipeline::builder(POST_POST)
        .shared(auth)
        .stage(StoreStage::lookup(store.clone(), |store, request, ctx| {
            let Some(id) = request.int("postCategoryId") else {
                return Flow::Continue;
            };
            match store.find_post_category(id) {
                Ok(category) => {
                    ctx.scope.post_category = category;
                    Flow::Continue
                }
                Err(e) => Flow::internal("postCategory.findOne Error - post-post", ctx, &e),
            }
        }))
        .stage(Validate::new(post_context_schema).named("validate-with-context"))
        .stage(StoreStage::execute(store, |store, request, ctx| {
            let user_id = match caller(ctx) {
                Ok(id) => id,
                Err(flow) => return flow,
            };
            let new = NewPost {
                user_id,
                post_category_id: request.int("postCategoryId"),
                message: request.text("message"),
                title: request.text("title"),
                post_to: request.int("postTo"),
                share_post_id: None,
            };
            match store.create_post(new) {
                Ok(post) => {
                    ctx.scope.created = Some(Created::Post(post));
                    Flow::Continue
                }
                Err(e) => Flow::internal("post.create Error - post-post", ctx, &e),
            }
        }))
        .respond(created_post)
}

pub fn share_schema() -> Schema {
    Schema::new()
        .params(
            "postId",
            FieldRules::new().is_int("Invalid Resource: Post Id"),
        )
        .body("message", optional_message_rules())
}

/// `POST /post/:postId/share`
///
/// The share inherits the source post's category. A missing source is left
/// to the insert, which rejects the dangling reference.
pub fn share_post(auth: Arc<dyn Stage>, store: Arc<dyn Store>) -> Pipeline {
    Pipeline::builder(POST_SHARE)
        .shared(auth)
        .stage(Validate::fixed(share_schema()))
        .stage(StoreStage::lookup(store.clone(), |store, request, ctx| {
            let Some(id) = request.int("postId") else {
                return Flow::Continue;
            };
            match store.find_post(id) {
                Ok(post) => {
                    ctx.scope.shared_post = post;
                    Flow::Continue
                }
                Err(e) => Flow::internal("post.findOne Error - post-share", ctx, &e),
            }
        }))
        .stage(StoreStage::execute(store, |store, request, ctx| {
            let user_id = match caller(ctx) {
                Ok(id) => id,
                Err(flow) => return flow,
            };
            let new = NewPost {
                user_id,
                post_category_id: ctx
                    .scope
                    .shared_post
                    .as_ref()
                    .and_then(|p| p.post_category_id),
                message: request.text("message"),
                share_post_id: request.int("postId"),
                ..NewPost::default()
            };
            match store.create_post(new) {
                Ok(post) => {
                    ctx.scope.created = Some(Created::Post(post));
                    Flow::Continue
                }
                Err(e) => Flow::internal("post.create Error - post-share", ctx, &e),
            }
        }))
        .respond(created_post)
}

fn created_post(ctx: &RequestContext) -> Envelope {
    match &ctx.scope.created {
        Some(Created::Post(post)) => Envelope::success(StatusCode::CREATED).with("post", post),
        _ => Envelope::success(StatusCode::CREATED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;
    use crate::store::{PostCategory, User};
    use crate::validation::Source;
    use chrono::Utc;

    fn category(code: &str) -> PostCategory {
        PostCategory {
            id: 1,
            code: code.to_string(),
            name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_title_required_only_for_stories() {
        let mut ctx = RequestContext::new(POST_POST).with_user(User::new(1));
        assert!(!post_context_schema(&ctx).has_field(Source::Body, "title"));

        ctx.scope.post_category = Some(category("status"));
        assert!(!post_context_schema(&ctx).has_field(Source::Body, "title"));

        ctx.scope.post_category = Some(category("story"));
        let errors = post_context_schema(&ctx).validate(&ApiRequest::new());
        let title: Vec<&str> = errors
            .iter()
            .filter(|e| e.param == "title")
            .map(|e| e.msg.as_str())
            .collect();
        assert_eq!(title, vec!["Missing Resource: Title"]);
    }

    #[test]
    fn test_story_reports_title_with_other_failures() {
        let mut ctx = RequestContext::new(POST_POST).with_user(User::new(1));
        ctx.scope.post_category = Some(category("story"));

        let body = serde_json::json!({"postCategoryId": 1})
            .as_object()
            .cloned()
            .unwrap();
        let errors = post_context_schema(&ctx).validate(&ApiRequest::new().with_body(body));
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["message", "message", "title"]);
    }

    #[test]
    fn test_post_schema_reports_missing_fields_together() {
        let errors = post_schema().validate(&ApiRequest::new());
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(
            params,
            vec!["postCategoryId", "postCategoryId", "message", "message"]
        );
    }
}
