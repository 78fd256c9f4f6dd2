//! Key issuance and draw redemption.
//!
//! [`DrawEngine`] ties together the key store, the prize table, a seedable
//! random number generator and the audit sink. All of its operations are
//! synchronous.
//!
//! # Locking
//!
//! Draws run inside [`KeyStore::redeem`], which holds the store's write lock.
//! The generator's mutex is only taken inside that closure or on its own while
//! generating a key code, never around a store call, so the lock order is
//! always store before generator.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;

use lucky_draw_core::{
    DrawError, DrawKey, DrawMode, DrawResult, KeyCode, PrizeTable, Result, DEFAULT_KEY_LENGTH,
    DEFAULT_MAX_USES,
};
use lucky_draw_store::{KeyStore, StoreError};

use crate::audit::DrawAudit;

/// Limits applied when issuing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPolicy {
    /// Largest usage count a key may be issued with.
    pub max_uses: u32,
    /// Digits per generated code.
    pub key_length: usize,
    /// Codes to try before giving up on a collision.
    pub issue_attempts: u32,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            max_uses: DEFAULT_MAX_USES,
            key_length: DEFAULT_KEY_LENGTH,
            issue_attempts: 8,
        }
    }
}

/// Issues keys and redeems them against the prize table.
pub struct DrawEngine {
    store: Arc<dyn KeyStore>,
    prizes: PrizeTable,
    rng: Mutex<StdRng>,
    audit: Arc<dyn DrawAudit>,
    policy: KeyPolicy,
}

impl DrawEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyStore>,
        prizes: PrizeTable,
        rng: StdRng,
        audit: Arc<dyn DrawAudit>,
        policy: KeyPolicy,
    ) -> Self {
        Self {
            store,
            prizes,
            rng: Mutex::new(rng),
            audit,
            policy,
        }
    }

    /// The prize table in use.
    #[must_use]
    pub fn prizes(&self) -> &PrizeTable {
        &self.prizes
    }

    /// The issuance limits in use.
    #[must_use]
    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// The underlying key store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyStore> {
        &self.store
    }

    // A panic while holding the generator cannot leave it in an unusable state.
    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a new key with `requested_uses` draws.
    ///
    /// Code collisions with live keys are retried with fresh codes up to
    /// `issue_attempts` times.
    ///
    /// # Errors
    ///
    /// - `DrawError::InvalidArgument` if `requested_uses` is below 1 or above `max_uses`.
    /// - `DrawError::DuplicateKey` if every attempted code was taken.
    pub fn issue_key(&self, requested_uses: i64) -> Result<DrawKey> {
        let mut last_collision = String::new();

        for attempt in 1..=self.policy.issue_attempts.max(1) {
            let code = KeyCode::generate(&mut *self.rng(), self.policy.key_length);
            let key = DrawKey::new(code, requested_uses, self.policy.max_uses)?;

            match self.store.insert_key(&key) {
                Ok(()) => {
                    self.audit.key_issued(&key);
                    return Ok(key);
                }
                Err(StoreError::DuplicateKey { key }) => {
                    tracing::debug!(attempt, key = %key, "Generated key code already in use");
                    last_collision = key;
                }
                Err(e) => return Err(e.into()),
            }
        }

        tracing::warn!(
            attempts = self.policy.issue_attempts,
            "Could not find a free key code"
        );
        Err(DrawError::DuplicateKey {
            key: last_collision,
        })
    }

    /// Look up a live key.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::InvalidKey` if no live key has this code.
    pub fn lookup_key(&self, code: &KeyCode) -> Result<DrawKey> {
        self.store
            .get_key(code)?
            .ok_or_else(|| DrawError::InvalidKey {
                key: code.to_string(),
            })
    }

    /// Redeem a key.
    ///
    /// `Single` performs one draw and consumes one use. `Batch` performs one
    /// independent draw per remaining use and consumes the whole key. The
    /// draws and the decrement commit together: if the store write fails, no
    /// results are returned and the key is left as it was.
    ///
    /// # Errors
    ///
    /// - `DrawError::InvalidKey` if no live key has this code.
    /// - `DrawError::ExhaustedKey` if the stored key has no uses left.
    /// - `DrawError::Storage` if the store fails.
    pub fn draw(&self, code: &KeyCode, mode: DrawMode) -> Result<Vec<DrawResult>> {
        let mut results = Vec::new();

        let redemption = self
            .store
            .redeem(code, &mut |key| {
                let draws = mode.draws_for(key.remaining_uses);
                results.clear();
                let mut rng = self.rng();
                for _ in 0..draws {
                    results.push(DrawResult::now(self.prizes.draw(&mut *rng)));
                }
                draws
            })
            .map_err(|e| match e {
                StoreError::NotFound => DrawError::InvalidKey {
                    key: code.to_string(),
                },
                other => other.into(),
            })?;

        self.audit
            .draws_committed(code, mode, &results, redemption.remaining);
        Ok(results)
    }

    /// Delete every key. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns `DrawError::Storage` if the store fails.
    pub fn clear_keys(&self) -> Result<usize> {
        let removed = self.store.clear_keys()?;
        self.audit.keys_cleared(removed);
        Ok(removed)
    }
}
