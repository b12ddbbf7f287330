#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backend;
mod config;
mod error;

pub use backend::ObjectStore;
pub use config::{FsConfig, StorageConfig};
pub use error::{StorageError, StorageResult};

#[cfg(feature = "gcs")]
pub use config::GcsConfig;
#[cfg(feature = "s3")]
pub use config::S3Config;

/// Tracing target for storage operations.
pub const TRACING_TARGET: &str = "deepsky_opendal";
