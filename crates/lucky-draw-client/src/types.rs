//! Request and response types for the lucky draw client.

use serde::{Deserialize, Serialize};

use lucky_draw_core::{DrawMode, DrawResult};

/// Key issuance request.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateKeyRequest {
    /// Draws the key should allow.
    pub usage_count: u32,
}

/// A key and its remaining uses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyResponse {
    /// The key code.
    pub key: String,
    /// Draws left on the key.
    pub usage_count: u32,
}

/// Draw request.
#[derive(Debug, Clone, Serialize)]
pub struct DrawRequest {
    /// The key to redeem.
    pub key: String,
    /// Single or batch.
    #[serde(rename = "type")]
    pub mode: DrawMode,
}

/// Draw response.
#[derive(Debug, Clone, Deserialize)]
pub struct DrawResponse {
    /// One result per draw, in draw order.
    pub results: Vec<DrawResult>,
}

/// Clear keys response.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearKeysResponse {
    /// Confirmation text.
    pub message: String,
    /// Number of keys deleted.
    pub deleted: usize,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Number of live keys.
    #[serde(default)]
    pub live_keys: Option<usize>,
}

/// API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}
