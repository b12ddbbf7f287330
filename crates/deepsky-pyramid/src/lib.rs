#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod generator;
mod layout;
mod manifest;

pub use error::{PyramidError, PyramidResult};
pub use generator::{GeneratedPyramid, PyramidGenerator};
pub use layout::{PREVIEW_WIDTH, PyramidLayout, TILE_OVERLAP, TILE_SIZE};
pub use manifest::DziManifest;

/// Tracing target for pyramid generation.
pub const TRACING_TARGET: &str = "deepsky_pyramid";
