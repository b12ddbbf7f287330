//! Embedding error types.

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Errors that can occur when parsing or comparing embedding vectors.
///
/// Comparisons across models or dimensionalities are hard errors rather than
/// silently mis-scored results.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Stored embedding string could not be parsed into numbers.
    #[error("malformed embedding value at position {position}: {value:?}")]
    Parse {
        /// Zero-based position of the offending component.
        position: usize,
        /// The component that failed to parse.
        value: String,
    },

    /// Stored embedding string is empty.
    #[error("embedding string is empty")]
    Empty,

    /// Vectors were produced by different embedding models.
    #[error("embedding model mismatch: {left} vs {right}")]
    ModelMismatch {
        /// Model tag of the left-hand vector.
        left: String,
        /// Model tag of the right-hand vector.
        right: String,
    },

    /// Vectors have different lengths.
    #[error("embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Length of the left-hand vector.
        left: usize,
        /// Length of the right-hand vector.
        right: usize,
    },
}
