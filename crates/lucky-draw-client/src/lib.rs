//! Lucky Draw Client SDK.
//!
//! This crate provides a client library for the lucky draw JSON API.
//!
//! # Example
//!
//! ```no_run
//! use lucky_draw_client::{DrawMode, LuckyDrawClient};
//!
//! # async fn example() -> Result<(), lucky_draw_client::ClientError> {
//! let client = LuckyDrawClient::new("http://lucky-draw:5000")?;
//!
//! let key = client.generate_key(3).await?;
//! let results = client.draw(&key.key, DrawMode::Batch).await?;
//!
//! for result in results {
//!     println!("{} at {}", result.prize, result.time);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, LuckyDrawClient};
pub use error::ClientError;
pub use lucky_draw_core::{DrawMode, DrawResult};
pub use types::*;
