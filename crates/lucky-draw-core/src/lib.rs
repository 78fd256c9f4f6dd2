//! Core types and utilities for the lucky draw service.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - **Identifiers**: `KeyCode`
//! - **Keys**: `DrawKey`, the credential that entitles its holder to a bounded number of draws
//! - **Prizes**: `PrizeEntry`, `PrizeTable`
//! - **Draws**: `DrawMode`, `DrawResult`
//!
//! # Draw keys
//!
//! A key is a short numeric code with a positive number of remaining uses.
//! A key whose count reaches zero is deleted, so a stored key always has at
//! least one draw left.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod draw;
pub mod error;
pub mod ids;
pub mod key;
pub mod prize;

pub use draw::{DrawMode, DrawResult};
pub use error::{DrawError, Result};
pub use ids::{IdError, KeyCode, DEFAULT_KEY_LENGTH};
pub use key::{DrawKey, DEFAULT_MAX_USES};
pub use prize::{PrizeEntry, PrizeTable, NO_PRIZE};
