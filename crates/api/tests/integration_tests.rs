//! Integration tests for the REST API
//!
//! Drives the full stack end-to-end: seeding content, listing duplicate
//! groups, bulk deletion, and canonical-link resolution.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use dcr_api::{create_router, create_router_with_config};
use dcr_manager::ManagerConfig;
use serde_json::{json, Value};
use tower::Service;

/// Helper function to send a request using a router
async fn send_request_with_app(
    app: &mut Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request_builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    let request = if let Some(body_json) = body {
        request_builder
            .body(Body::from(serde_json::to_string(&body_json).unwrap()))
            .unwrap()
    } else {
        request_builder.body(Body::empty()).unwrap()
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));

    (status, json)
}

/// Helper for stateless tests
async fn send_request(method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut app = create_router();
    send_request_with_app(&mut app, method, uri, body).await
}

/// Seed one published post, returning its id
async fn seed_post(app: &mut Router, title: &str, slug: &str, created_at: &str) -> u64 {
    let request = json!({
        "title": title,
        "slug": slug,
        "kind": "post",
        "created_at": created_at
    });

    let (status, body) = send_request_with_app(app, "POST", "/content", Some(request)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_u64().expect("Expected record id")
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send_request("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Duplicate Content Resolver");
}

#[tokio::test]
async fn test_add_and_retrieve_content() {
    let mut app = create_router();

    let id = seed_post(&mut app, "Hello", "hello", "2024-01-01T00:00:00Z").await;

    let uri = format!("/content/{}", id);
    let (status, body) = send_request_with_app(&mut app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["slug"], "hello");
    assert_eq!(body["permalink"], "http://localhost/hello");
}

#[tokio::test]
async fn test_duplicates_listing() {
    let mut app = create_router();

    let original = seed_post(&mut app, "Hello", "hello", "2024-01-01T00:00:00Z").await;
    let copy_a = seed_post(&mut app, "Hello", "hello-2", "2024-01-02T00:00:00Z").await;
    let copy_b = seed_post(&mut app, "Hello", "hello-3", "2024-01-03T00:00:00Z").await;
    seed_post(&mut app, "Unrelated", "unrelated", "2024-01-04T00:00:00Z").await;

    let (status, body) = send_request_with_app(&mut app, "GET", "/duplicates", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_groups"], 1);
    assert_eq!(body["total_pages"], 1);

    let group = &body["groups"][0];
    assert_eq!(group["original"]["id"], original);
    assert_eq!(group["duplicates"].as_array().unwrap().len(), 2);
    assert_eq!(group["duplicates"][0]["id"], copy_a);
    assert_eq!(group["duplicates"][1]["id"], copy_b);
    assert_eq!(group["canonical_url"], "http://localhost/hello");
}

#[tokio::test]
async fn test_duplicates_page_clamping() {
    let mut app = create_router();

    seed_post(&mut app, "Hello", "hello", "2024-01-01T00:00:00Z").await;
    seed_post(&mut app, "Hello", "hello-2", "2024-01-02T00:00:00Z").await;

    // Page 0 clamps to 1.
    let (status, body) =
        send_request_with_app(&mut app, "GET", "/duplicates?page=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["groups"].as_array().unwrap().len(), 1);

    // A page past the end is empty but keeps the totals.
    let (status, body) =
        send_request_with_app(&mut app, "GET", "/duplicates?page=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_groups"], 1);
    assert!(body["groups"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_canonical_resolution_earliest_wins() {
    let mut app = create_router();

    // Created out of slug order: the plain slug is the youngest.
    let newest = seed_post(&mut app, "Foo", "foo", "2024-03-03T00:00:00Z").await;
    let earliest = seed_post(&mut app, "Foo", "foo-2", "2024-01-01T00:00:00Z").await;
    seed_post(&mut app, "Foo", "foo-3", "2024-02-02T00:00:00Z").await;

    let uri = format!("/content/{}/canonical", newest);
    let (status, body) = send_request_with_app(&mut app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_duplicate"], true);
    assert_eq!(body["canonical_id"], earliest);
    assert_eq!(body["href"], "http://localhost/foo-2");

    // The earliest record is canonical and, with default emission off,
    // gets no link at all.
    let uri = format!("/content/{}/canonical", earliest);
    let (status, body) = send_request_with_app(&mut app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_duplicate"], false);
    assert!(body["canonical_id"].is_null());
    assert!(body["href"].is_null());
}

#[tokio::test]
async fn test_canonical_default_emission_flag() {
    let config = ManagerConfig::default().with_emit_default_canonical(true);
    let mut app = create_router_with_config(config);

    let id = seed_post(&mut app, "Solo", "solo", "2024-01-01T00:00:00Z").await;

    let uri = format!("/content/{}/canonical", id);
    let (status, body) = send_request_with_app(&mut app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_duplicate"], false);
    assert_eq!(body["href"], "http://localhost/solo");
}

#[tokio::test]
async fn test_bulk_delete_flow() {
    let mut app = create_router();

    seed_post(&mut app, "Hello", "hello", "2024-01-01T00:00:00Z").await;
    let copy = seed_post(&mut app, "Hello", "hello-2", "2024-01-02T00:00:00Z").await;

    let delete_request = json!({ "ids": [copy, 9999] });
    let (status, body) =
        send_request_with_app(&mut app, "POST", "/duplicates/delete", Some(delete_request))
            .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!([copy]));
    assert_eq!(body["missing"], json!([9999]));
    assert!(body["failed"].as_array().unwrap().is_empty());

    // The group is gone from the listing.
    let (status, body) = send_request_with_app(&mut app, "GET", "/duplicates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_groups"], 0);
}

#[tokio::test]
async fn test_delete_absent_content_is_noop() {
    let (status, _) = send_request("DELETE", "/content/424242", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_system_stats() {
    let mut app = create_router();

    seed_post(&mut app, "Hello", "hello", "2024-01-01T00:00:00Z").await;
    seed_post(&mut app, "Hello", "hello-2", "2024-01-02T00:00:00Z").await;
    send_request_with_app(&mut app, "GET", "/duplicates", None).await;

    let (status, body) = send_request_with_app(&mut app, "GET", "/system/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scans_run"], 1);
    assert_eq!(body["groups_found"], 1);
}

#[tokio::test]
async fn test_canonical_for_missing_record() {
    let (status, _) = send_request("GET", "/content/31337/canonical", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_content_id() {
    let (status, _) = send_request("GET", "/content/not-a-number", None).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_malformed_add_request() {
    let bad_request = json!({
        "invalid_field": "should fail"
    });

    let (status, _) = send_request("POST", "/content", Some(bad_request)).await;

    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_invalid_created_at() {
    let bad_request = json!({
        "title": "Hello",
        "slug": "hello",
        "kind": "post",
        "created_at": "not-a-timestamp"
    });

    let (status, body) = send_request("POST", "/content", Some(bad_request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("created_at"));
}
