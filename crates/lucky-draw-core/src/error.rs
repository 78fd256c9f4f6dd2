//! Error types for the lucky draw service.

use crate::ids::IdError;

/// Result type for lucky draw operations.
pub type Result<T> = std::result::Result<T, DrawError>;

/// Errors that can occur while issuing or redeeming draw keys.
#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The generated key code collides with a live key.
    #[error("key already exists: {key}")]
    DuplicateKey {
        /// The colliding key code.
        key: String,
    },

    /// No live key matches the given code.
    #[error("invalid draw key: {key}")]
    InvalidKey {
        /// The key code that was not found.
        key: String,
    },

    /// The key exists but has no draws left.
    #[error("draw key exhausted: {key}")]
    ExhaustedKey {
        /// The exhausted key code.
        key: String,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed key code.
    #[error("invalid key code: {0}")]
    InvalidKeyCode(#[from] IdError),
}

impl DrawError {
    /// Whether this error was caused by the caller rather than the service.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::DuplicateKey { .. }
                | Self::InvalidKey { .. }
                | Self::ExhaustedKey { .. }
                | Self::InvalidKeyCode(_)
        )
    }
}
