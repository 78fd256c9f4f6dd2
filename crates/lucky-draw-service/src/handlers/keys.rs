//! Key issuance, lookup and bulk deletion handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use lucky_draw_core::{DrawError, DrawKey, KeyCode};

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Confirmation shown after all keys are deleted.
pub const KEYS_CLEARED_MESSAGE: &str = "所有秘钥已成功删除！";

/// Generate key request.
#[derive(Debug, Deserialize)]
pub struct GenerateKeyRequest {
    /// Draws the key entitles its holder to.
    #[serde(default = "default_usage_count")]
    pub usage_count: i64,
}

const fn default_usage_count() -> i64 {
    1
}

/// A key and its remaining uses.
#[derive(Debug, Serialize)]
pub struct KeyResponse {
    /// The key code.
    pub key: String,
    /// Draws left on the key.
    pub usage_count: u32,
}

impl From<&DrawKey> for KeyResponse {
    fn from(key: &DrawKey) -> Self {
        Self {
            key: key.code.to_string(),
            usage_count: key.remaining_uses,
        }
    }
}

/// Clear keys response.
#[derive(Debug, Serialize)]
pub struct ClearKeysResponse {
    /// Confirmation text.
    pub message: String,
    /// Number of keys deleted.
    pub deleted: usize,
}

/// Issue a new key.
pub async fn generate_key(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateKeyRequest>, JsonRejection>,
) -> Result<Json<KeyResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request("invalid_body", e.body_text()))?;

    let key = state.engine.issue_key(body.usage_count)?;
    Ok(Json(KeyResponse::from(&key)))
}

/// Look up a live key.
pub async fn get_key(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>, ApiError> {
    let not_found = || ApiError::NotFound(format!("key not found: {key}"));

    let code: KeyCode = key.parse().map_err(|_| not_found())?;
    match state.engine.lookup_key(&code) {
        Ok(key) => Ok(Json(KeyResponse::from(&key))),
        Err(DrawError::InvalidKey { .. }) => Err(not_found()),
        Err(e) => Err(e.into()),
    }
}

/// Delete every key.
pub async fn clear_keys(
    State(state): State<Arc<AppState>>,
    auth: AdminAuth,
) -> Result<Json<ClearKeysResponse>, ApiError> {
    let deleted = state.engine.clear_keys()?;
    tracing::info!(deleted, admin_verified = auth.verified, "Cleared draw keys");

    Ok(Json(ClearKeysResponse {
        message: KEYS_CLEARED_MESSAGE.to_string(),
        deleted,
    }))
}
