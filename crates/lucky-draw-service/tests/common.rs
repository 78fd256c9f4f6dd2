//! Common test utilities for lucky-draw integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use lucky_draw_service::crypto::sha1_hex;
use lucky_draw_service::{create_router, AppState, ServiceConfig};
use lucky_draw_store::{KeyStore, MemoryStore};

/// Token shared with the simulated platform.
pub const WECHAT_TOKEN: &str = "test-wechat-token";

/// Admin key required by `/clear_keys` in the admin harness.
pub const ADMIN_API_KEY: &str = "test-admin-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for inspecting state directly.
    pub store: Arc<dyn KeyStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: Option<TempDir>,
}

impl TestHarness {
    /// Create a new test harness with an in-memory store.
    pub fn new() -> Self {
        Self::with_config(Self::config())
    }

    /// Create a harness whose `/clear_keys` requires [`ADMIN_API_KEY`].
    pub fn with_admin_key() -> Self {
        Self::with_config(ServiceConfig {
            admin_api_key: Some(ADMIN_API_KEY.into()),
            ..Self::config()
        })
    }

    /// Create a harness from a config, backed by a fresh in-memory store.
    pub fn with_config(config: ServiceConfig) -> Self {
        Self::build(Arc::new(MemoryStore::new()), config, None)
    }

    /// Create a harness backed by `RocksDB` in a temporary directory.
    #[cfg(feature = "rocksdb-backend")]
    pub fn with_rocksdb() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = lucky_draw_store::RocksStore::open(temp_dir.path())
            .expect("Failed to open store");

        let config = ServiceConfig {
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            ..Self::config()
        };

        Self::build(Arc::new(store), config, Some(temp_dir))
    }

    fn build(store: Arc<dyn KeyStore>, config: ServiceConfig, temp_dir: Option<TempDir>) -> Self {
        let state = AppState::new(Arc::clone(&store), config).expect("Failed to build state");
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Baseline test configuration with a fixed seed.
    pub fn config() -> ServiceConfig {
        ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            wechat_token: Some(WECHAT_TOKEN.into()),
            public_base_url: "https://draw.example.com".into(),
            rng_seed: Some(42),
            ..ServiceConfig::default()
        }
    }

    /// Issue a key through the API and return its code.
    pub async fn issue_key(&self, usage_count: i64) -> String {
        let response = self
            .server
            .post("/generate_key")
            .json(&json!({ "usage_count": usage_count }))
            .await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        body["key"].as_str().expect("key in response").to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign `timestamp` and `nonce` the way the platform does.
pub fn sign(token: &str, timestamp: &str, nonce: &str) -> String {
    let mut parts = [token, timestamp, nonce];
    parts.sort_unstable();
    sha1_hex(&parts.concat())
}
