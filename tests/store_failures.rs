//! Store Failure Tests
//!
//! Any data access failure ends the request with one opaque 500 envelope
//! and never reports a partially created record as success.

mod common;

use axum::http::StatusCode;
use campushub::store::fault::points;
use campushub::store::PostKind;
use common::TestApp;
use serde_json::{json, Value};

fn assert_internal(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "INTERNAL_ERROR");
    assert_eq!(body["status_code"], 2);
    assert_eq!(body["http_code"], 500);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn test_create_failure_creates_nothing() {
    let app = TestApp::new();
    app.store.faults().arm(points::POST_CREATE);

    let (status, body) = app
        .post("/post", 1, json!({"postCategoryId": 2, "message": "lost"}))
        .await;
    assert_internal(status, &body);
    assert!(body.get("post").is_none());
    assert_eq!(app.store.post_count().unwrap(), 11);

    app.store.faults().disarm(points::POST_CREATE);
    let (status, _) = app
        .post("/post", 1, json!({"postCategoryId": 2, "message": "kept"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_failure_detail_does_not_leak() {
    let app = TestApp::new();
    app.store.faults().arm(points::RATING_CREATE);

    let (status, body) = app.post("/post/1/rating", 2, json!({"rating": 5})).await;
    assert_internal(status, &body);
    assert!(!body.to_string().contains("fault"));
    assert_eq!(app.store.rating_count(PostKind::Post).unwrap(), 3);
}

#[tokio::test]
async fn test_dangling_reference_is_internal() {
    let app = TestApp::new();
    let (status, body) = app.post("/post/999/like", 1, json!({})).await;
    assert_internal(status, &body);

    let (status, body) = app.post("/post/999/share", 1, json!({})).await;
    assert_internal(status, &body);
}

#[tokio::test]
async fn test_lookup_failure_is_internal() {
    let app = TestApp::new();
    app.store.faults().arm(points::POST_CATEGORY_FIND_ONE);

    let (status, body) = app
        .post("/post", 1, json!({"postCategoryId": 1, "message": "x", "title": "t"}))
        .await;
    assert_internal(status, &body);
}

#[tokio::test]
async fn test_auth_lookup_failure_is_internal() {
    let app = TestApp::new();
    app.store.faults().arm(points::USER_FIND_ONE);
    let (status, body) = app.get("/v2/list", 1).await;
    assert_internal(status, &body);
}

#[tokio::test]
async fn test_timeline_read_failure_is_internal() {
    let app = TestApp::new();
    app.store.faults().arm(points::COMMUNITY_POST_FIND_ALL);
    let (status, body) = app.get("/v2/list", 1).await;
    assert_internal(status, &body);
    assert!(body.get("posts").is_none());
}
