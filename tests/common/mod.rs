//! Shared setup for the HTTP-level tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use campushub::auth::JwtManager;
use campushub::http_server::{HttpServer, ServerConfig};
use campushub::store::{Fixtures, MemoryStore, RowId};

/// Seed data used by every test
///
/// - user 1 owns posts 1 (Jan 3) and 2 (Jan 1) and personal community
///   post 1 (Jan 2); community post 2 belongs to a community
/// - post 1 has ratings [2, 4, 5], three likes, two pageviews, one share
///   and two replies
/// - user 3 is suspended, user 4 has eight posts
pub fn fixtures() -> Value {
    let mut posts = vec![
        json!({"id": 1, "userId": 1, "postCategoryId": 2, "message": "third",
               "createdAt": "2024-01-03T00:00:00Z"}),
        json!({"id": 2, "userId": 1, "postCategoryId": 2, "message": "first",
               "createdAt": "2024-01-01T00:00:00Z"}),
        json!({"id": 3, "userId": 2, "postCategoryId": 2, "message": "shared",
               "sharePostId": 1, "createdAt": "2024-01-04T00:00:00Z"}),
    ];
    for i in 0..8 {
        posts.push(json!({
            "id": 10 + i,
            "userId": 4,
            "message": format!("post {}", i),
            "createdAt": format!("2024-02-{:02}T00:00:00Z", i + 1),
        }));
    }

    json!({
        "users": [
            {"id": 1, "firstName": "Ada", "lastName": "Lovelace",
             "email": "ada@campus.edu", "schoolName": "Analytical", "password": "hash"},
            {"id": 2, "firstName": "Grace", "lastName": "Hopper", "email": "grace@campus.edu"},
            {"id": 3, "firstName": "Mallory", "isSuspended": true},
            {"id": 4, "firstName": "Prolific"}
        ],
        "postCategories": [
            {"id": 1, "code": "story", "name": "Story"},
            {"id": 2, "code": "status", "name": "Status"}
        ],
        "communities": [{"id": 1, "name": "General"}],
        "posts": posts,
        "communityPosts": [
            {"id": 1, "userId": 1, "message": "personal", "createdAt": "2024-01-02T00:00:00Z"},
            {"id": 2, "userId": 1, "communityId": 1, "message": "in general",
             "createdAt": "2024-01-05T00:00:00Z"}
        ],
        "eventPosts": [{"id": 1, "userId": 2, "message": "hackathon"}],
        "ratings": [
            {"id": 1, "kind": "post", "postId": 1, "userId": 2, "rating": 2.0},
            {"id": 2, "kind": "post", "postId": 1, "userId": 2, "rating": 4.0},
            {"id": 3, "kind": "post", "postId": 1, "userId": 4, "rating": 5.0}
        ],
        "likes": [
            {"id": 1, "kind": "post", "postId": 1, "userId": 2},
            {"id": 2, "kind": "post", "postId": 1, "userId": 3},
            {"id": 3, "kind": "post", "postId": 1, "userId": 4}
        ],
        "pageviews": [
            {"id": 1, "kind": "post", "postId": 1, "userId": 2},
            {"id": 2, "kind": "post", "postId": 1, "userId": 4}
        ],
        "replies": [
            {"id": 1, "kind": "post", "postId": 1, "userId": 2, "comment": "nice",
             "createdAt": "2024-01-03T01:00:00Z"},
            {"id": 2, "kind": "post", "postId": 1, "userId": 1, "comment": "thanks",
             "createdAt": "2024-01-03T02:00:00Z"}
        ]
    })
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub jwt: JwtManager,
}

impl TestApp {
    pub fn new() -> Self {
        let fixtures: Fixtures = serde_json::from_value(fixtures()).unwrap();
        let store = Arc::new(MemoryStore::from_fixtures(fixtures).unwrap());
        let config = ServerConfig::default();
        let router = HttpServer::build_router(&config, store.clone());
        Self {
            router,
            store,
            jwt: JwtManager::new(config.jwt),
        }
    }

    pub fn token(&self, user_id: RowId) -> String {
        self.jwt.issue(user_id).unwrap()
    }

    /// Send a request as `user_id` and return status plus JSON body
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<RowId>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = user_id {
            builder = builder.header("authorization", format!("Bearer {}", self.token(id)));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, user_id: RowId) -> (StatusCode, Value) {
        self.call(Method::GET, uri, Some(user_id), None).await
    }

    pub async fn post(&self, uri: &str, user_id: RowId, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, uri, Some(user_id), Some(body)).await
    }
}

/// `param` of every reported field error
pub fn error_params(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["param"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// `msg` of every reported field error
pub fn error_messages(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["msg"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
