//! Key encoding utilities for `RocksDB`.
//!
//! Draw keys are stored under the raw ASCII bytes of their code, so iteration
//! order over the column family is the lexicographic order of the codes.

use lucky_draw_core::KeyCode;

/// Create the record key for a draw key code.
#[must_use]
pub fn draw_key_key(code: &KeyCode) -> Vec<u8> {
    code.as_bytes().to_vec()
}
