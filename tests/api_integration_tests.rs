//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint, including TTL
//! expiry, version invalidation, eviction, and the persistent store.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use sitecache::{api::create_router, cache::CacheManager, AppState, PersistentStore};
use std::thread::sleep;
use std::time::Duration;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let cache = CacheManager::new(1024 * 1024);
    let state = AppState::new(cache);
    create_router(state)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_set(key: &str, value: &str, extra: &str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/set")
        .header("content-type", "application/json")
        .body(Body::from(format!(
            r#"{{"key":"{}","value":{}{}}}"#,
            key, value, extra
        )))
        .unwrap()
}

fn get_key(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_set("test_key", r#"{"name":"A"}"#, ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert!(json.get("message").is_some());
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_set_endpoint_with_ttl() {
    let app = create_test_app();

    let response = app
        .oneshot(put_set("ttl_key", r#""ttl_value""#, r#","ttl_ms":60000"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_set_endpoint_with_maximum_ttl() {
    let app = create_test_app();

    // A client may send any u64 as ttl_ms; the largest one must behave as
    // "never expires", not wrap into the past
    let response = app
        .clone()
        .oneshot(put_set(
            "max_ttl",
            r#""kept""#,
            &format!(r#","ttl_ms":{}"#, u64::MAX),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_key("/get/max_ttl")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_set_endpoint_rejects_oversized_entry() {
    let cache = CacheManager::new(16);
    let state = AppState::new(cache);
    let app = create_router(state);

    let big = format!(r#""{}""#, "x".repeat(100));
    let response = app.oneshot(put_set("big", &big, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set("get_key", r#"{"sku":"LS-001"}"#, ""))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_key("/get/get_key")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), "get_key");
    assert_eq!(json["value"]["sku"].as_str().unwrap(), "LS-001");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_key("/get/nonexistent_key")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_endpoint_version_mismatch_purges() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set("vkey", r#""v""#, r#","version":"A""#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    // Wrong version is a 404 and purges the entry
    let response = app
        .clone()
        .oneshot(get_key("/get/vkey?version=B"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Even the right version misses now
    let response = app.oneshot(get_key("/get/vkey?version=A")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set("delete_key", r#""delete_value""#, ""))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let del_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/del/delete_key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(del_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_key("/get/delete_key")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_endpoint_is_idempotent() {
    let app = create_test_app();

    // Deleting a key that never existed still succeeds
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/del/nonexistent_key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// == CLEAR Endpoint Tests ==

#[tokio::test]
async fn test_clear_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("a", r#"1"#, ""))
        .await
        .unwrap();
    let _ = app
        .clone()
        .oneshot(put_set("b", r#"2"#, ""))
        .await
        .unwrap();

    let clear_response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(clear_response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get_key("/stats")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["item_count"].as_u64().unwrap(), 0);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    let _ = app
        .clone()
        .oneshot(put_set("stats_key", r#""stats_value""#, ""))
        .await
        .unwrap();

    // Hit
    let _ = app.clone().oneshot(get_key("/get/stats_key")).await.unwrap();
    // Miss
    let _ = app
        .clone()
        .oneshot(get_key("/get/nonexistent"))
        .await
        .unwrap();

    let response = app.oneshot(get_key("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;

    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 1);
    assert_eq!(json["item_count"].as_u64().unwrap(), 1);
    assert!(json["total_bytes"].as_u64().unwrap() > 0);
    assert!(json.get("hit_rate").is_some());
    assert!(json.get("memory_usage").is_some());
    assert!(json.get("expired_count").is_some());
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get_key("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"invalid json"#))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 422 for JSON parsing errors by default
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let response = app
        .oneshot(put_set("", r#""test""#, ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(put_set("ttl_test", r#""expires_soon""#, r#","ttl_ms":100"#))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    // Exists immediately
    let get_response = app.clone().oneshot(get_key("/get/ttl_test")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    sleep(Duration::from_millis(150));

    // Expired now
    let get_response = app.oneshot(get_key("/get/ttl_test")).await.unwrap();
    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}

// == Eviction via API Tests ==

#[tokio::test]
async fn test_lru_eviction_via_api() {
    // Three 12-byte entries fill the budget exactly
    let cache = CacheManager::new(36);
    let state = AppState::new(cache);
    let app = create_router(state);

    for key in ["k1", "k2", "k3"] {
        let value = format!(r#""{}""#, "x".repeat(10));
        let response = app.clone().oneshot(put_set(key, &value, "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Touch k1 so k2 becomes the true LRU
    let response = app.clone().oneshot(get_key("/get/k1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Inserting a fourth entry forces one eviction
    let value = format!(r#""{}""#, "x".repeat(10));
    let response = app.clone().oneshot(put_set("k4", &value, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // k2 was evicted, not the recently read k1
    let response = app.clone().oneshot(get_key("/get/k2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = app.clone().oneshot(get_key("/get/k1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.oneshot(get_key("/get/k4")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// == Persistent Store Endpoint Tests ==

async fn create_persist_app() -> (tempfile::TempDir, Router) {
    let temp = tempfile::tempdir().unwrap();
    let store = PersistentStore::open(temp.path()).await.unwrap();
    let state = AppState::new(CacheManager::new(1024 * 1024)).with_persist(Arc::new(store));
    (temp, create_router(state))
}

#[tokio::test]
async fn test_persist_set_and_get_endpoints() {
    let (_temp, app) = create_persist_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/persist/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key":"catalog","value":[1,2,3]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_key("/persist/get/catalog")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], serde_json::json!([1, 2, 3]));
}

#[tokio::test]
async fn test_persist_delete_and_clear_endpoints() {
    let (_temp, app) = create_persist_app().await;

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/persist/set")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"key":"a","value":1}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/persist/del/a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_key("/persist/get/a"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/persist/clear")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_persist_endpoints_unconfigured() {
    let app = create_test_app();

    let response = app.oneshot(get_key("/persist/get/k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
