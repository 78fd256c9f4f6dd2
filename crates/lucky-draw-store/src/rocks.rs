//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `KeyStore` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use lucky_draw_core::{DrawKey, KeyCode};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::{plan_redemption, KeyStore, KeyUpdate, Redemption};

/// RocksDB-backed storage implementation.
///
/// Reads go straight to the database. Every mutation takes `write_lock`,
/// which makes each read-modify-write atomic with respect to the others.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl KeyStore for RocksStore {
    fn insert_key(&self, key: &DrawKey) -> Result<()> {
        let _guard = self.lock()?;

        if self.get_key(&key.code)?.is_some() {
            return Err(StoreError::DuplicateKey {
                key: key.code.to_string(),
            });
        }

        let cf = self.cf(cf::DRAW_KEYS)?;
        let value = Self::serialize(key)?;
        self.db
            .put_cf(&cf, keys::draw_key_key(&key.code), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(key = %key.code, uses = key.remaining_uses, "Stored draw key");
        Ok(())
    }

    fn get_key(&self, code: &KeyCode) -> Result<Option<DrawKey>> {
        let cf = self.cf(cf::DRAW_KEYS)?;

        self.db
            .get_cf(&cf, keys::draw_key_key(code))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn redeem(&self, code: &KeyCode, plan: &mut dyn FnMut(&DrawKey) -> u32) -> Result<Redemption> {
        let _guard = self.lock()?;

        let key = self.get_key(code)?.ok_or(StoreError::NotFound)?;
        let (redemption, update) = plan_redemption(key, plan)?;

        let cf = self.cf(cf::DRAW_KEYS)?;
        let record_key = keys::draw_key_key(code);
        match update {
            KeyUpdate::Unchanged => {}
            KeyUpdate::Put(key) => {
                let value = Self::serialize(&key)?;
                self.db
                    .put_cf(&cf, record_key, value)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
            }
            KeyUpdate::Delete => {
                self.db
                    .delete_cf(&cf, record_key)
                    .map_err(|e| StoreError::Database(e.to_string()))?;
                tracing::debug!(key = %code, "Draw key used up and deleted");
            }
        }

        Ok(redemption)
    }

    fn clear_keys(&self) -> Result<usize> {
        let _guard = self.lock()?;
        let cf = self.cf(cf::DRAW_KEYS)?;

        let mut batch = WriteBatch::default();
        let mut removed = 0;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            batch.delete_cf(&cf, key);
            removed += 1;
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(removed)
    }

    fn count_keys(&self) -> Result<usize> {
        let cf = self.cf(cf::DRAW_KEYS)?;

        let mut count = 0;
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            item.map_err(|e| StoreError::Database(e.to_string()))?;
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn insert(store: &RocksStore, code: &str, uses: i64) -> KeyCode {
        let key = DrawKey::new(code.parse().unwrap(), uses, 100).unwrap();
        store.insert_key(&key).unwrap();
        key.code
    }

    #[test]
    fn key_lifecycle() {
        let (store, _dir) = create_test_store();
        let code = insert(&store, "0042", 5);

        // Read
        let key = store.get_key(&code).unwrap().unwrap();
        assert_eq!(key.remaining_uses, 5);

        // Single use
        assert_eq!(store.consume(&code, 1).unwrap(), 4);
        assert_eq!(store.get_key(&code).unwrap().unwrap().remaining_uses, 4);

        // Remaining uses; record is deleted rather than stored at zero
        assert_eq!(store.consume(&code, 4).unwrap(), 0);
        assert!(store.get_key(&code).unwrap().is_none());

        // Further consumption fails
        assert!(matches!(
            store.consume(&code, 1),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn issue_then_lookup_for_every_valid_count() {
        let (store, _dir) = create_test_store();
        for uses in 1..=100 {
            let code = insert(&store, &format!("{uses:04}"), uses);
            let key = store.get_key(&code).unwrap().unwrap();
            assert_eq!(i64::from(key.remaining_uses), uses);
        }
        assert_eq!(store.count_keys().unwrap(), 100);
    }

    #[test]
    fn duplicate_key_rejected() {
        let (store, _dir) = create_test_store();
        insert(&store, "1234", 3);

        let dup = DrawKey::new("1234".parse().unwrap(), 9, 100).unwrap();
        assert!(matches!(
            store.insert_key(&dup),
            Err(StoreError::DuplicateKey { .. })
        ));
        assert_eq!(store.get_key(&dup.code).unwrap().unwrap().remaining_uses, 3);
    }

    #[test]
    fn overconsumption_clamps_and_deletes() {
        let (store, _dir) = create_test_store();
        let code = insert(&store, "7777", 3);

        let redemption = store.redeem(&code, &mut |_| 10).unwrap();
        assert_eq!(redemption.consumed, 3);
        assert_eq!(redemption.remaining, 0);
        assert!(store.get_key(&code).unwrap().is_none());
    }

    #[test]
    fn clear_keys_removes_all() {
        let (store, _dir) = create_test_store();
        insert(&store, "1111", 1);
        insert(&store, "2222", 2);
        insert(&store, "3333", 3);

        assert_eq!(store.clear_keys().unwrap(), 3);
        assert_eq!(store.count_keys().unwrap(), 0);
        assert!(store.get_key(&"2222".parse().unwrap()).unwrap().is_none());
    }

    #[test]
    fn keys_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = RocksStore::open(dir.path()).unwrap();
            insert(&store, "5555", 8);
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let key = store.get_key(&"5555".parse().unwrap()).unwrap().unwrap();
        assert_eq!(key.remaining_uses, 8);
    }

    #[test]
    fn concurrent_redemptions_never_double_spend() {
        let (store, _dir) = create_test_store();
        let store = Arc::new(store);
        let code = insert(&store, "4242", 40);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let code = code.clone();
                std::thread::spawn(move || {
                    let mut consumed = 0;
                    while let Ok(r) = store.redeem(&code, &mut |_| 1) {
                        consumed += r.consumed;
                    }
                    consumed
                })
            })
            .collect();

        let total: u32 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 40);
        assert!(store.get_key(&code).unwrap().is_none());
    }
}
