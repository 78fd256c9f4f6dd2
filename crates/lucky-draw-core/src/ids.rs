//! Identifier types for the lucky draw service.
//!
//! Draw keys are identified by short numeric codes that users type in by hand,
//! so the code is the only identifier a key has.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of digits in a generated key code.
pub const DEFAULT_KEY_LENGTH: usize = 4;

/// Longest code accepted when parsing user input.
const MAX_KEY_LENGTH: usize = 32;

/// A draw key code: a non-empty string of ASCII digits.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyCode(String);

impl KeyCode {
    /// Generate a random code of `length` decimal digits.
    ///
    /// Leading zeros are kept, so `"0042"` is a valid four-digit code.
    pub fn generate<R: Rng>(rng: &mut R, length: usize) -> Self {
        let code = (0..length.max(1))
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    /// Return the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the code as bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for KeyCode {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.len() > MAX_KEY_LENGTH {
            return Err(IdError::TooLong);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::NotNumeric);
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Debug for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyCode({})", self.0)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for KeyCode {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyCode> for String {
    fn from(code: KeyCode) -> Self {
        code.0
    }
}

impl AsRef<[u8]> for KeyCode {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is empty.
    #[error("key code is empty")]
    Empty,

    /// The input is longer than any code the service issues.
    #[error("key code is too long")]
    TooLong,

    /// The input contains characters other than ASCII digits.
    #[error("key code must contain only digits")]
    NotNumeric,
}
