//! CLI configuration management.
//!
//! The full configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, shutdown
//! ├── middleware: MiddlewareConfig # CORS, recovery/timeouts
//! ├── postgres: PgConfig           # Catalog database
//! ├── embeddings: EmbeddingConfig  # OpenAI embeddings
//! ├── storage: StorageArgs         # Object storage backend
//! └── publishing options           # Public URL, concurrency, deadlines
//! ```
//!
//! Every option can be provided via CLI arguments or environment variables.
//! Use `--help` to see them all.

mod middleware;
mod server;
mod storage;

use std::process;

use anyhow::Context;
use clap::Parser;
use deepsky_postgres::PgConfig;
use deepsky_rig::EmbeddingConfig;
use deepsky_server::service::ServiceConfig;
pub use middleware::MiddlewareConfig;
pub use server::ServerConfig;
pub use storage::StorageArgs;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the deepsky server:
/// - [`ServerConfig`]: network binding and shutdown
/// - [`MiddlewareConfig`]: HTTP middleware (CORS, recovery)
/// - [`PgConfig`]: catalog database connection and pooling
/// - [`EmbeddingConfig`]: OpenAI embeddings provider
/// - [`StorageArgs`]: object storage backend selection
#[derive(Debug, Clone, Parser)]
#[command(name = "deepsky")]
#[command(about = "Deepsky astronomical image catalog server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Catalog database configuration.
    #[clap(flatten)]
    pub postgres: PgConfig,

    /// Embeddings provider configuration.
    #[clap(flatten)]
    pub embeddings: EmbeddingConfig,

    /// Object storage backend configuration.
    #[clap(flatten)]
    pub storage: StorageArgs,

    /// Public base URL under which published storage keys are reachable.
    #[arg(long, env = "PUBLIC_BUCKET_URL")]
    pub public_bucket_url: Url,

    /// Bound on concurrent tile uploads within one publish.
    #[arg(long, env = "TILE_CONCURRENCY", default_value_t = 8)]
    pub tile_concurrency: usize,

    /// Bound on concurrent preview fetches when resolving base64 images.
    #[arg(long, env = "PREVIEW_CONCURRENCY", default_value_t = 8)]
    pub preview_concurrency: usize,

    /// Deadline in seconds for decoding and tiling one source image.
    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value_t = 60)]
    pub generation_timeout_secs: u64,

    /// Deadline in seconds for publishing one derived-asset set.
    #[arg(long, env = "PUBLISH_TIMEOUT_SECS", default_value_t = 120)]
    pub publish_timeout_secs: u64,
}

impl Cli {
    /// Loads environment variables from a .env file (if enabled) and parses
    /// CLI arguments.
    ///
    /// Loading .env before clap parses arguments lets its `env` attributes
    /// pick up values from the file.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from a .env file.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when the dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        Ok(())
    }

    /// Assembles the service configuration from the parsed arguments.
    pub fn service_config(&self) -> anyhow::Result<ServiceConfig> {
        let storage = self
            .storage
            .clone()
            .into_config()
            .context("invalid storage configuration")?;

        let config = ServiceConfig::builder()
            .with_postgres(self.postgres.clone())
            .with_storage(storage)
            .with_embeddings(self.embeddings.clone())
            .with_public_bucket_url(self.public_bucket_url.clone())
            .with_tile_concurrency(self.tile_concurrency)
            .with_preview_concurrency(self.preview_concurrency)
            .with_generation_timeout_secs(self.generation_timeout_secs)
            .with_publish_timeout_secs(self.publish_timeout_secs)
            .build()?;

        Ok(config)
    }

    /// Logs configuration at startup (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            postgres_max_connections = self.postgres.postgres_max_connections,
            storage_backend = %self.storage.storage_backend,
            embedding_model = %self.embeddings.embedding_model,
            public_bucket_url = %self.public_bucket_url,
            tile_concurrency = self.tile_concurrency,
            "Service configuration loaded"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "gcs").then_some("gcs"),
            cfg!(feature = "s3").then_some("s3"),
            cfg!(feature = "dotenv").then_some("dotenv"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_arguments_are_consistent() {
        Cli::command().debug_assert();
    }
}
