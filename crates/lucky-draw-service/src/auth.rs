//! Admin authentication extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::crypto::constant_time_eq;
use crate::error::ApiError;
use crate::state::AppState;

/// Admin access to destructive endpoints.
///
/// When `admin_api_key` is configured, the `X-API-Key` header must match it.
/// Without a configured key every request is admitted.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    /// Whether a key was actually checked.
    pub verified: bool,
}

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let Some(expected_key) = state.config.admin_api_key.as_ref() else {
                return Ok(AdminAuth { verified: false });
            };

            let api_key = parts
                .headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .ok_or(ApiError::Unauthorized)?;

            if !constant_time_eq(api_key, expected_key) {
                tracing::warn!("Rejected admin request with wrong API key");
                return Err(ApiError::Unauthorized);
            }

            Ok(AdminAuth { verified: true })
        })
    }
}
