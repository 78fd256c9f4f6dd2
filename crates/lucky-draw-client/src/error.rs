//! Client error types.

/// Errors that can occur when using the lucky draw client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The key does not exist or was used up.
    #[error("invalid draw key: {message}")]
    InvalidKey {
        /// Server message.
        message: String,
    },

    /// The key has no draws left.
    #[error("draw key exhausted: {message}")]
    ExhaustedKey {
        /// Server message.
        message: String,
    },
}
