#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod content_type;
mod embedding;
mod error;
mod namespace;
mod rank;

pub use content_type::{CONTENT_TYPE_JPEG, CONTENT_TYPE_PNG, CONTENT_TYPE_XML, preview_content_type};
pub use embedding::EmbeddingVector;
pub use error::{EmbeddingError, EmbeddingResult};
pub use namespace::ImageNamespace;
pub use rank::{MAX_RANKED_RESULTS, Ranked, SIMILARITY_THRESHOLD, rank};

/// Tracing target for core domain operations.
pub const TRACING_TARGET: &str = "deepsky_core";
