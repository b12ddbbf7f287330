#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod error;
mod model;
mod provider;

pub use config::EmbeddingConfig;
pub use error::{EmbedError, EmbedResult};
pub use model::EmbeddingModel;
pub use provider::EmbeddingProvider;

/// Tracing target for embedding operations.
pub const TRACING_TARGET: &str = "deepsky_rig";
