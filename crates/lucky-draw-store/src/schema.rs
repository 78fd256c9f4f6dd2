//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Live draw keys, keyed by key code. Values are CBOR-encoded `DrawKey` records.
    pub const DRAW_KEYS: &str = "draw_keys";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::DRAW_KEYS]
}
