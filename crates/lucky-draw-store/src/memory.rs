//! In-memory storage implementation.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use lucky_draw_core::{DrawKey, KeyCode};

use crate::error::{Result, StoreError};
use crate::{plan_redemption, KeyStore, KeyUpdate, Redemption};

/// A `KeyStore` backed by a map behind a mutex. Contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: Mutex<BTreeMap<KeyCode, DrawKey>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<KeyCode, DrawKey>>> {
        self.keys
            .lock()
            .map_err(|_| StoreError::Database("key map lock poisoned".into()))
    }
}

impl KeyStore for MemoryStore {
    fn insert_key(&self, key: &DrawKey) -> Result<()> {
        let mut keys = self.lock()?;
        if keys.contains_key(&key.code) {
            return Err(StoreError::DuplicateKey {
                key: key.code.to_string(),
            });
        }
        keys.insert(key.code.clone(), key.clone());
        Ok(())
    }

    fn get_key(&self, code: &KeyCode) -> Result<Option<DrawKey>> {
        Ok(self.lock()?.get(code).cloned())
    }

    fn redeem(&self, code: &KeyCode, plan: &mut dyn FnMut(&DrawKey) -> u32) -> Result<Redemption> {
        let mut keys = self.lock()?;
        let key = keys.get(code).cloned().ok_or(StoreError::NotFound)?;

        let (redemption, update) = plan_redemption(key, plan)?;
        match update {
            KeyUpdate::Unchanged => {}
            KeyUpdate::Put(key) => {
                keys.insert(code.clone(), key);
            }
            KeyUpdate::Delete => {
                keys.remove(code);
            }
        }

        Ok(redemption)
    }

    fn clear_keys(&self) -> Result<usize> {
        let mut keys = self.lock()?;
        let removed = keys.len();
        keys.clear();
        Ok(removed)
    }

    fn count_keys(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }
}
