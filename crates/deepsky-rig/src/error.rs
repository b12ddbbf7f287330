//! Embedding error types.

use std::time::Duration;

/// Result type for embedding operations.
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Errors that can occur while computing embeddings.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Invalid provider configuration.
    #[error("embedding configuration error: {0}")]
    Config(String),

    /// The upstream provider rejected or failed the request.
    #[error("embedding provider error: {0}")]
    Provider(String),

    /// The request did not complete within the configured timeout.
    #[error("embedding request timed out after {0:?}")]
    Timeout(Duration),

    /// The provider returned a vector of unexpected length.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensions the model is configured for.
        expected: usize,
        /// Dimensions the provider actually returned.
        actual: usize,
    },
}

impl EmbedError {
    /// Creates a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}
