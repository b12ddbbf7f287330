//! Service state, configuration, and domain services.

mod config;
mod error;
mod preview;
mod search;
mod state;

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{ServiceError, ServiceResult};
pub use preview::PreviewResolver;
pub use search::SemanticSearch;
pub use state::{PublicBucketUrl, ServiceState};

/// Tracing target for service lifecycle events.
pub const TRACING_TARGET: &str = "deepsky_server::service";
