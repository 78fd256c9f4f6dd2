//! Health check handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status: `ok`, or `degraded` if the store cannot be read.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Number of live keys, if the store answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_keys: Option<usize>,
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let live_keys = match state.engine.store().count_keys() {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::error!(error = %e, "Health check could not count keys");
            None
        }
    };

    Json(HealthResponse {
        status: if live_keys.is_some() { "ok" } else { "degraded" }.to_string(),
        service: "lucky-draw".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        live_keys,
    })
}
