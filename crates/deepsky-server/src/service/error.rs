//! Service-level error types.

use deepsky_opendal::StorageError;
use deepsky_postgres::PgError;
use deepsky_rig::EmbedError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while constructing or using service-level clients.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Catalog store failure.
    #[error(transparent)]
    Postgres(#[from] PgError),

    /// Object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Embeddings provider failure.
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Embedding comparison failure (model or dimension mismatch, or a
    /// malformed stored vector).
    #[error(transparent)]
    Embedding(#[from] deepsky_core::EmbeddingError),

    /// Invalid service configuration.
    #[error("service configuration error: {0}")]
    Config(String),
}
