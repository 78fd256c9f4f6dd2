//! Application state.

use std::sync::Arc;

use lucky_draw_core::DrawError;
use lucky_draw_store::KeyStore;

use crate::audit::{DrawAudit, TracingAudit};
use crate::config::ServiceConfig;
use crate::engine::DrawEngine;
use crate::wechat::MessageDispatcher;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Key issuance and redemption.
    pub engine: Arc<DrawEngine>,

    /// Canned replies for webhook messages.
    pub dispatcher: MessageDispatcher,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state with the tracing audit sink.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::Configuration` if the prize table cannot be loaded.
    pub fn new(store: Arc<dyn KeyStore>, config: ServiceConfig) -> Result<Self, DrawError> {
        Self::with_audit(store, config, Arc::new(TracingAudit))
    }

    /// Create a new application state reporting to `audit`.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::Configuration` if the prize table cannot be loaded.
    pub fn with_audit(
        store: Arc<dyn KeyStore>,
        config: ServiceConfig,
        audit: Arc<dyn DrawAudit>,
    ) -> Result<Self, DrawError> {
        let engine = DrawEngine::new(
            store,
            config.prize_table()?,
            config.rng(),
            audit,
            config.key_policy(),
        );

        if config.wechat_token.is_none() {
            tracing::warn!("WeChat token not configured - webhook requests will be rejected");
        }
        if config.admin_api_key.is_none() {
            tracing::warn!("Admin API key not configured - /clear_keys is unprotected");
        }

        Ok(Self {
            engine: Arc::new(engine),
            dispatcher: MessageDispatcher::new(&config.public_base_url),
            config,
        })
    }
}
