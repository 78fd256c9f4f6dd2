//! Draw modes and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DrawError;

/// How many of a key's remaining uses a draw request consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// One draw, consuming one use.
    Single,
    /// One draw per remaining use, consuming the whole key.
    Batch,
}

impl DrawMode {
    /// The wire name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Batch => "batch",
        }
    }

    /// Number of draws this mode performs against a key with `remaining` uses.
    #[must_use]
    pub const fn draws_for(self, remaining: u32) -> u32 {
        match self {
            Self::Single => 1,
            Self::Batch => remaining,
        }
    }
}

impl FromStr for DrawMode {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "batch" => Ok(Self::Batch),
            other => Err(DrawError::InvalidArgument(format!(
                "unsupported draw type: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of one draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    /// The prize label.
    pub prize: String,

    /// When the draw happened.
    pub time: DateTime<Utc>,
}

impl DrawResult {
    /// Create a result stamped with the current time.
    #[must_use]
    pub fn now(prize: impl Into<String>) -> Self {
        Self {
            prize: prize.into(),
            time: Utc::now(),
        }
    }
}
