//! Lucky draw HTTP API service.
//!
//! This crate provides the HTTP API for issuing and redeeming draw keys:
//!
//! - Key issuance, lookup and bulk deletion
//! - Single and batch draws against a weighted prize table
//! - A WeChat official-account webhook that links users to the draw pages
//!
//! # Authentication
//!
//! Webhook requests are authenticated by the platform's SHA-1 handshake
//! signature. `/clear_keys` optionally requires an admin API key; the other
//! JSON endpoints are public, a draw key being its own credential.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers call the synchronous engine

pub mod audit;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod wechat;

pub use audit::{DrawAudit, TracingAudit};
pub use config::ServiceConfig;
pub use engine::{DrawEngine, KeyPolicy};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
