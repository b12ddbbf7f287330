//! HTTP middleware configuration.

use clap::Args;
use deepsky_server::middleware::{CorsConfig, RecoveryConfig};

use crate::TRACING_TARGET_CONFIG;

/// HTTP middleware configuration groups.
#[derive(Debug, Clone, Args)]
pub struct MiddlewareConfig {
    /// CORS configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Error recovery and timeout configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at startup.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_origins = ?self.cors.allowed_origins,
            cors_max_age_secs = self.cors.max_age_seconds,
            request_timeout_secs = self.recovery.request_timeout,
            "Middleware configuration loaded"
        );
    }
}
