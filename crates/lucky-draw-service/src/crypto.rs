//! Cryptographic utilities for webhook verification.
//!
//! This module provides the hashing and comparison primitives used to check
//! WeChat handshake signatures.

use sha1::{Digest, Sha1};

/// Compute SHA-1 over the UTF-8 bytes of `message` and return it hex-encoded.
///
/// The result is 40 lowercase hex characters.
#[must_use]
pub fn sha1_hex(message: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(message.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare two strings without short-circuiting on the first differing byte.
///
/// Length mismatches return early; only equal-length inputs are compared in
/// constant time.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
