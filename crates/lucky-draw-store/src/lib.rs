//! Storage layer for lucky draw keys.
//!
//! This crate owns every `DrawKey` record. Two backends implement the
//! [`KeyStore`] trait:
//!
//! - [`RocksStore`]: persistent `RocksDB` storage (feature `rocksdb-backend`, on by default)
//! - [`MemoryStore`]: an in-process map, for tests and throwaway deployments
//!
//! # Redemption
//!
//! Mutating a key goes through [`KeyStore::redeem`], a unit of work over one
//! record: the store takes its write lock, reads the key, asks the caller how
//! many uses to consume, then either updates the record or deletes it when the
//! count reaches zero. Two redemptions of the same key can never observe the
//! same pre-decrement count.
//!
//! # Example
//!
//! ```
//! use lucky_draw_core::DrawKey;
//! use lucky_draw_store::{KeyStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let key = DrawKey::new("1234".parse().unwrap(), 5, 100).unwrap();
//! store.insert_key(&key).unwrap();
//!
//! let remaining = store.consume(&key.code, 1).unwrap();
//! assert_eq!(remaining, 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use lucky_draw_core::{DrawKey, KeyCode};

/// Outcome of a committed redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redemption {
    /// Uses taken from the key.
    pub consumed: u32,
    /// Uses left afterwards. Zero means the key was deleted.
    pub remaining: u32,
}

/// The storage trait defining all draw key operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait KeyStore: Send + Sync {
    /// Insert a new key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateKey` if a live key already has this code.
    fn insert_key(&self, key: &DrawKey) -> Result<()>;

    /// Get a key by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_key(&self, code: &KeyCode) -> Result<Option<DrawKey>>;

    /// Redeem uses from a key as a single read-modify-write.
    ///
    /// `plan` sees the current record and returns how many uses to consume.
    /// It runs while the store's write lock is held, so whatever it computes
    /// is committed together with the decrement. The new count is clamped at
    /// zero, and a key reaching zero is deleted.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the key doesn't exist.
    /// - `StoreError::Exhausted` if the stored count is already zero.
    fn redeem(&self, code: &KeyCode, plan: &mut dyn FnMut(&DrawKey) -> u32) -> Result<Redemption>;

    /// Delete every key, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn clear_keys(&self) -> Result<usize>;

    /// Count live keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn count_keys(&self) -> Result<usize>;

    /// Consume a fixed number of uses, returning the remaining count.
    ///
    /// # Errors
    ///
    /// Same as [`KeyStore::redeem`].
    fn consume(&self, code: &KeyCode, uses: u32) -> Result<u32> {
        self.redeem(code, &mut |_| uses).map(|r| r.remaining)
    }
}

/// What a redemption writes back for a key.
pub(crate) enum KeyUpdate {
    /// Nothing to write.
    Unchanged,
    /// Store the updated record.
    Put(DrawKey),
    /// Remove the record.
    Delete,
}

/// Apply a redemption plan to a loaded key.
///
/// Shared by the backends so that both enforce the same rules.
pub(crate) fn plan_redemption(
    key: DrawKey,
    plan: &mut dyn FnMut(&DrawKey) -> u32,
) -> Result<(Redemption, KeyUpdate)> {
    if !key.is_live() {
        return Err(StoreError::Exhausted {
            key: key.code.to_string(),
        });
    }

    let uses = plan(&key);
    let remaining = key.remaining_after(uses);
    let redemption = Redemption {
        consumed: key.remaining_uses - remaining,
        remaining,
    };

    let update = if redemption.consumed == 0 {
        KeyUpdate::Unchanged
    } else if remaining == 0 {
        KeyUpdate::Delete
    } else {
        KeyUpdate::Put(DrawKey {
            remaining_uses: remaining,
            ..key
        })
    };

    Ok((redemption, update))
}
