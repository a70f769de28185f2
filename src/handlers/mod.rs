//! # Endpoint Handlers
//!
//! One [`Pipeline`] per endpoint. Every pipeline starts with the shared
//! authorization gate; the remaining stages are validation, optional
//! context lookup, one store operation and the response formatter.

pub mod community_post;
pub mod engagement;
pub mod post;
pub mod stages;
pub mod timeline;
pub mod user;

use std::sync::Arc;

use crate::auth::JwtManager;
use crate::core::{AuthGate, Pipeline, Stage};
use crate::store::{PostKind, Store};
use crate::validation::FieldRules;

pub use engagement::Action;

const LENGTH_MESSAGE: &str = "Invalid Resource: Minimum 1 and maximum 280 characters are allowed";

/// Required 1..=280 character message
pub fn message_rules() -> FieldRules {
    FieldRules::new()
        .not_empty("Missing Resource: Message")
        .is_length(1, 280, LENGTH_MESSAGE)
}

/// Required 1..=280 character reply comment
pub fn comment_rules() -> FieldRules {
    FieldRules::new()
        .not_empty("Missing Resource: Comment")
        .is_length(1, 280, LENGTH_MESSAGE)
}

/// Message that may be left out, but not sent empty
pub fn optional_message_rules() -> FieldRules {
    FieldRules::new().optional().is_length(1, 280, LENGTH_MESSAGE)
}

/// Engagement endpoints served per post kind
pub const ENGAGEMENTS: &[(PostKind, Action)] = &[
    (PostKind::Post, Action::Rating),
    (PostKind::Post, Action::Like),
    (PostKind::Post, Action::Pageview),
    (PostKind::Post, Action::Reply),
    (PostKind::CommunityPost, Action::Rating),
    (PostKind::CommunityPost, Action::Like),
    (PostKind::CommunityPost, Action::Pageview),
    (PostKind::CommunityPost, Action::Reply),
    (PostKind::EventPost, Action::Rating),
];

/// Every endpoint pipeline, sharing one auth gate and one store
pub struct Pipelines {
    pub timeline: Pipeline,
    pub create_post: Pipeline,
    pub share_post: Pipeline,
    pub create_community_post: Pipeline,
    pub user_profile: Pipeline,
    /// Route path and pipeline of each engagement endpoint
    pub engagements: Vec<(String, Pipeline)>,
}

impl Pipelines {
    pub fn new(store: Arc<dyn Store>, jwt: Arc<JwtManager>) -> Self {
        let auth: Arc<dyn Stage> = Arc::new(AuthGate::new(jwt, store.clone()));

        let engagements = ENGAGEMENTS
            .iter()
            .map(|&(kind, action)| {
                (
                    engagement::route(kind, action),
                    engagement::pipeline(kind, action, auth.clone(), store.clone()),
                )
            })
            .collect();

        Self {
            timeline: timeline::timeline(auth.clone(), store.clone()),
            create_post: post::create_post(auth.clone(), store.clone()),
            share_post: post::share_post(auth.clone(), store.clone()),
            create_community_post: community_post::create_community_post(
                auth.clone(),
                store.clone(),
            ),
            user_profile: user::user_profile(auth, store),
            engagements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;
    use crate::auth::JwtConfig;
    use crate::store::fault::points;
    use crate::store::{Fixtures, MemoryStore, PostCategory, User};
    use chrono::Utc;
    use serde_json::{json, Map, Value};

    struct Harness {
        store: Arc<MemoryStore>,
        pipelines: Pipelines,
        token: String,
    }

    fn harness() -> Harness {
        let story = PostCategory {
            id: 1,
            code: "story".to_string(),
            name: Some("Story".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let store = Arc::new(
            MemoryStore::from_fixtures(Fixtures {
                users: vec![User::new(1), User::new(2)],
                post_categories: vec![story],
                ..Fixtures::default()
            })
            .unwrap(),
        );
        let jwt = Arc::new(JwtManager::new(JwtConfig::default()));
        let token = jwt.issue(1).unwrap();
        let pipelines = Pipelines::new(store.clone(), jwt);
        Harness {
            store,
            pipelines,
            token,
        }
    }

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_story_without_title_is_rejected() {
        let h = harness();
        let request = ApiRequest::new()
            .with_bearer(&h.token)
            .with_body(body(json!({"postCategoryId": 1, "message": "hi"})));

        let envelope = h.pipelines.create_post.handle(request).await;
        assert_eq!(envelope.http_code, 400);
        assert_eq!(envelope.payload["errors"][0]["param"], "title");
        assert_eq!(h.store.post_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_story_with_title_is_created() {
        let h = harness();
        let request = ApiRequest::new().with_bearer(&h.token).with_body(body(
            json!({"postCategoryId": "1", "message": "hi", "title": "Day one"}),
        ));

        let envelope = h.pipelines.create_post.handle(request).await;
        assert_eq!(envelope.http_code, 201);
        assert_eq!(envelope.payload["post"]["title"], "Day one");
        assert_eq!(envelope.payload["post"]["userId"], 1);
    }

    #[tokio::test]
    async fn test_create_failure_is_opaque_and_creates_nothing() {
        let h = harness();
        h.store.faults().arm(points::POST_CREATE);
        let request = ApiRequest::new().with_bearer(&h.token).with_body(body(
            json!({"postCategoryId": 1, "message": "hi", "title": "t"}),
        ));

        let envelope = h.pipelines.create_post.handle(request).await;
        assert_eq!(envelope.http_code, 500);
        assert_eq!(envelope.payload["message"], "Internal server error");
        assert_eq!(h.store.post_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_internal() {
        let h = harness();
        h.store.faults().arm(points::POST_CATEGORY_FIND_ONE);
        let request = ApiRequest::new()
            .with_bearer(&h.token)
            .with_body(body(json!({"postCategoryId": 1, "message": "hi"})));

        let envelope = h.pipelines.create_post.handle(request).await;
        assert_eq!(envelope.http_code, 500);
    }

    #[tokio::test]
    async fn test_every_engagement_endpoint_is_registered() {
        let h = harness();
        let routes: Vec<&str> = h
            .pipelines
            .engagements
            .iter()
            .map(|(route, _)| route.as_str())
            .collect();
        assert!(!routes.contains(&"/post/:postId/share"));
        assert!(routes.contains(&"/event-post/:eventPostId/rating"));
        assert_eq!(routes.len(), ENGAGEMENTS.len());
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_found() {
        let h = harness();
        let request = ApiRequest::new().with_bearer(&h.token).with_param("userId", "42");
        let envelope = h.pipelines.user_profile.handle(request).await;
        assert_eq!(envelope.http_code, 404);

        let request = ApiRequest::new().with_bearer(&h.token).with_param("userId", "2");
        let envelope = h.pipelines.user_profile.handle(request).await;
        assert_eq!(envelope.http_code, 200);
        assert_eq!(envelope.payload["user"]["id"], 2);
        assert!(envelope.payload["user"].get("password").is_none());
    }
}
