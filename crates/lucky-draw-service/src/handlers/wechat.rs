//! WeChat webhook handlers.
//!
//! Both verbs answer a failed signature check with an empty `200`, which the
//! platform treats as "no reply". Missing signature parameters are a `403`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::wechat::{InboundMessage, SignatureMismatch, SignedRequest, VerifiedRequest};

const MISSING_PARAMS: &str = "Forbidden: Data is required but not provided";

/// Query parameters the platform attaches to every webhook call.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    /// Hex SHA-1 signature.
    pub signature: Option<String>,
    /// Signed timestamp.
    pub timestamp: Option<String>,
    /// Signed nonce.
    pub nonce: Option<String>,
    /// Handshake challenge, echoed back on success.
    pub echostr: Option<String>,
}

impl WebhookQuery {
    fn signed_request(&mut self) -> Result<SignedRequest, ApiError> {
        match (
            self.signature.take(),
            self.timestamp.take(),
            self.nonce.take(),
        ) {
            (Some(signature), Some(timestamp), Some(nonce)) => {
                Ok(SignedRequest::new(signature, timestamp, nonce))
            }
            _ => Err(ApiError::Forbidden(MISSING_PARAMS.into())),
        }
    }
}

fn verify(state: &AppState, request: SignedRequest) -> Result<VerifiedRequest, SignatureMismatch> {
    let Some(token) = state.config.wechat_token.as_deref() else {
        tracing::warn!("Webhook request received but no WeChat token is configured");
        return Err(SignatureMismatch);
    };

    request.verify(token).map_err(|mismatch| {
        tracing::warn!("Webhook signature mismatch");
        mismatch
    })
}

/// `GET /`: ownership handshake.
pub async fn handshake(
    State(state): State<Arc<AppState>>,
    Query(mut query): Query<WebhookQuery>,
) -> Result<String, ApiError> {
    let signed = query.signed_request()?;
    let echostr = query
        .echostr
        .take()
        .ok_or_else(|| ApiError::Forbidden(MISSING_PARAMS.into()))?;

    match verify(&state, signed) {
        Ok(verified) => {
            tracing::info!(timestamp = %verified.timestamp, "Webhook handshake verified");
            Ok(echostr)
        }
        Err(SignatureMismatch) => Ok(String::new()),
    }
}

/// `POST /`: inbound message.
pub async fn receive_message(
    State(state): State<Arc<AppState>>,
    Query(mut query): Query<WebhookQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let signed = query.signed_request()?;
    if verify(&state, signed).is_err() {
        return Ok(String::new().into_response());
    }

    // Decode only after verification.
    let body = std::str::from_utf8(&body).map_err(|e| ApiError::Internal(e.to_string()))?;
    if body.trim().is_empty() {
        return Ok("success".into_response());
    }

    let message = InboundMessage::parse(body).map_err(|e| ApiError::Internal(e.to_string()))?;
    let reply = state.dispatcher.dispatch(&message);
    let xml = reply
        .to_xml()
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}
