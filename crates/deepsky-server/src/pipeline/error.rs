//! Pipeline error types.

use std::borrow::Cow;

use deepsky_opendal::StorageError;
use deepsky_postgres::PgError;
use deepsky_pyramid::PyramidError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that can abort an ingestion.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The upload failed validation before any storage write.
    #[error("{0}")]
    Validation(String),

    /// Pyramid generation failed.
    #[error(transparent)]
    Pyramid(#[from] PyramidError),

    /// Reading a staged artifact from disk failed.
    #[error("staging read failed: {0}")]
    Staging(#[from] std::io::Error),

    /// An upload to object storage failed past its retry budget.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The catalog insert failed; published artifacts are left in place
    /// but no row exists, so readers never see the image.
    #[error(transparent)]
    Catalog(#[from] PgError),

    /// Post-publish verification found a key missing from storage.
    #[error("published artifact missing from storage: {key}")]
    MissingArtifact {
        /// The storage key that failed the existence check.
        key: String,
    },

    /// A pipeline stage exceeded its deadline.
    #[error("pipeline stage {stage:?} timed out")]
    StageTimeout {
        /// The stage that timed out.
        stage: &'static str,
    },

    /// Unexpected internal failure (e.g. a panicked blocking task).
    #[error("unexpected pipeline failure: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PipelineError {
    /// Creates a validation error with the given client-facing message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
