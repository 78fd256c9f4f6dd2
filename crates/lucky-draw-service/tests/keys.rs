//! Key issuance, lookup and clearing integration tests.

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use common::{TestHarness, ADMIN_API_KEY};
use serde_json::json;

// ============================================================================
// Generate Key
// ============================================================================

#[tokio::test]
async fn generate_key_returns_code_and_count() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/generate_key")
        .json(&json!({ "usage_count": 5 }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let key = body["key"].as_str().unwrap();
    assert_eq!(key.len(), 4);
    assert!(key.bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(body["usage_count"], 5);
}

#[tokio::test]
async fn generate_key_defaults_to_one_use() {
    let harness = TestHarness::new();

    let response = harness.server.post("/generate_key").json(&json!({})).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["usage_count"], 1);
}

#[tokio::test]
async fn generate_key_accepts_the_maximum() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/generate_key")
        .json(&json!({ "usage_count": 100 }))
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn generate_key_rejects_out_of_range_counts() {
    let harness = TestHarness::new();

    for count in [101, 0, -3] {
        let response = harness
            .server
            .post("/generate_key")
            .json(&json!({ "usage_count": count }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["code"], "invalid_argument");
        assert!(body["error"].is_string());
    }

    assert_eq!(harness.store.count_keys().unwrap(), 0);
}

#[tokio::test]
async fn generate_key_rejects_malformed_body() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/generate_key")
        .json(&json!({ "usage_count": "lots" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "invalid_body");
}

// ============================================================================
// Lookup
// ============================================================================

#[tokio::test]
async fn issued_key_can_be_looked_up() {
    let harness = TestHarness::new();
    let key = harness.issue_key(7).await;

    let response = harness.server.get(&format!("/keys/{key}")).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["key"], key);
    assert_eq!(body["usage_count"], 7);
}

#[tokio::test]
async fn unknown_key_is_not_found() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/keys/98765")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    harness
        .server
        .get("/keys/abcd")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Clear Keys
// ============================================================================

#[tokio::test]
async fn clear_keys_deletes_everything() {
    let harness = TestHarness::new();
    let key = harness.issue_key(2).await;
    harness.issue_key(9).await;

    let response = harness.server.get("/clear_keys").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "所有秘钥已成功删除！");
    assert_eq!(body["deleted"], 2);

    harness
        .server
        .get(&format!("/keys/{key}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_keys_requires_admin_key_when_configured() {
    let harness = TestHarness::with_admin_key();
    harness.issue_key(2).await;

    harness
        .server
        .get("/clear_keys")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    harness
        .server
        .get("/clear_keys")
        .add_header(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_static("wrong-key"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(harness.store.count_keys().unwrap(), 1);

    let response = harness
        .server
        .get("/clear_keys")
        .add_header(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_static(ADMIN_API_KEY),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(harness.store.count_keys().unwrap(), 0);
}

// ============================================================================
// Persistence
// ============================================================================

#[cfg(feature = "rocksdb-backend")]
#[tokio::test]
async fn rocksdb_backed_service_issues_and_clears() {
    let harness = TestHarness::with_rocksdb();
    let key = harness.issue_key(4).await;

    let body: serde_json::Value = harness.server.get(&format!("/keys/{key}")).await.json();
    assert_eq!(body["usage_count"], 4);

    let body: serde_json::Value = harness.server.get("/clear_keys").await.json();
    assert_eq!(body["deleted"], 1);
}
