#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use axum::extract::FromRef;
use deepsky_postgres::{PgClient, run_pending_migrations};
use deepsky_server::handler;
use deepsky_server::middleware::{RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt};
use deepsky_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

/// Tracing target for startup events.
pub const TRACING_TARGET_STARTUP: &str = "deepsky_cli::startup";

/// Tracing target for shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "deepsky_cli::shutdown";

/// Tracing target for configuration events.
pub const TRACING_TARGET_CONFIG: &str = "deepsky_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let service_config = cli
        .service_config()
        .context("invalid service configuration")?;
    let state =
        ServiceState::from_config(&service_config).context("failed to initialize services")?;

    apply_migrations(&state).await?;

    let router = create_router(state, &cli.middleware);
    server::serve(router, cli.server).await?;

    Ok(())
}

/// Brings the catalog schema up to date before serving traffic.
async fn apply_migrations(state: &ServiceState) -> anyhow::Result<()> {
    let client = PgClient::from_ref(state);
    let applied = run_pending_migrations(&client)
        .await
        .context("failed to run database migrations")?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        applied = applied.len(),
        "database migrations are up to date"
    );

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost): catches panics and enforces timeouts
/// 2. Observability: request IDs and tracing spans
/// 3. Security: CORS and body limits
/// 4. Routes (innermost): the request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    handler::routes(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
