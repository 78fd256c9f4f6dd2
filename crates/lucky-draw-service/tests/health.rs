//! Health endpoint integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn health_check_returns_ok() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
}

#[tokio::test]
async fn health_check_returns_json() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "lucky-draw");
    assert_eq!(body["live_keys"], 0);
}

#[tokio::test]
async fn health_check_counts_live_keys() {
    let harness = TestHarness::new();
    harness.issue_key(3).await;
    harness.issue_key(1).await;

    let body: serde_json::Value = harness.server.get("/health").await.json();
    assert_eq!(body["live_keys"], 2);
}
