//! Draw redemption handler.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use lucky_draw_core::{DrawError, DrawMode, DrawResult, KeyCode};

use crate::error::ApiError;
use crate::state::AppState;

/// Draw request.
#[derive(Debug, Deserialize)]
pub struct DrawRequest {
    /// The key to redeem.
    pub key: String,
    /// `single` or `batch`.
    #[serde(rename = "type")]
    pub draw_type: String,
}

/// Draw response: one entry per draw, in draw order.
#[derive(Debug, Serialize)]
pub struct DrawResponse {
    /// Prize and timestamp of each draw.
    pub results: Vec<DrawResult>,
}

/// Redeem a key.
pub async fn draw(
    State(state): State<Arc<AppState>>,
    body: Result<Json<DrawRequest>, JsonRejection>,
) -> Result<Json<DrawResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request("invalid_body", e.body_text()))?;

    let code: KeyCode = body.key.parse().map_err(DrawError::from)?;
    let mode: DrawMode = body.draw_type.parse()?;

    let results = state.engine.draw(&code, mode)?;
    Ok(Json(DrawResponse { results }))
}
