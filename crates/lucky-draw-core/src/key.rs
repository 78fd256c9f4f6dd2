//! Draw key records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DrawError, Result};
use crate::ids::KeyCode;

/// Default upper bound on the number of uses a key can be issued with.
pub const DEFAULT_MAX_USES: u32 = 100;

/// A draw credential with a bounded number of remaining uses.
///
/// A stored key always has `remaining_uses > 0`. The store deletes a key at
/// the moment its count reaches zero instead of persisting an empty record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawKey {
    /// The code users enter to redeem the key.
    pub code: KeyCode,

    /// Draws left on this key.
    pub remaining_uses: u32,

    /// When the key was issued.
    pub created_at: DateTime<Utc>,
}

impl DrawKey {
    /// Create a key with `uses` draws, checking it against `max_uses`.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::InvalidArgument` if `uses` is zero or exceeds `max_uses`.
    pub fn new(code: KeyCode, uses: i64, max_uses: u32) -> Result<Self> {
        if uses > i64::from(max_uses) {
            return Err(DrawError::InvalidArgument(format!(
                "usage count cannot exceed {max_uses}"
            )));
        }
        let remaining_uses = u32::try_from(uses)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                DrawError::InvalidArgument("usage count must be at least 1".to_string())
            })?;

        Ok(Self {
            code,
            remaining_uses,
            created_at: Utc::now(),
        })
    }

    /// Whether the key still has draws left.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.remaining_uses > 0
    }

    /// Remaining count after consuming `uses`, clamped at zero.
    #[must_use]
    pub const fn remaining_after(&self, uses: u32) -> u32 {
        self.remaining_uses.saturating_sub(uses)
    }
}
