//! Error types for lucky draw storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// A live key already uses this code.
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The colliding key code.
        key: String,
    },

    /// The stored key has no uses left.
    #[error("key exhausted: {key}")]
    Exhausted {
        /// The exhausted key code.
        key: String,
    },
}

impl From<StoreError> for lucky_draw_core::DrawError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { key } => Self::DuplicateKey { key },
            StoreError::Exhausted { key } => Self::ExhaustedKey { key },
            StoreError::NotFound => Self::InvalidKey {
                key: String::new(),
            },
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Storage(msg),
        }
    }
}
