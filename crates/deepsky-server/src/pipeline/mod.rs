//! Image ingestion pipeline.
//!
//! One ingestion runs its stages in order: validate the upload, generate
//! the deep-zoom pyramid in local staging, publish every derived asset to
//! object storage, then insert the catalog row as the final commit marker.
//! Readers never observe a catalog row whose artifacts are not fully
//! published.

mod error;
mod ingest;
mod publisher;

pub use error::{PipelineError, PipelineResult};
pub use ingest::{IngestPipeline, IngestRequest, PipelineConfig};
pub use publisher::{ArtifactPublisher, PublishedArtifacts};

/// Tracing target for pipeline operations.
pub const TRACING_TARGET: &str = "deepsky_server::pipeline";
