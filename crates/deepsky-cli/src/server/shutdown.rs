//! Shutdown signal handling.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

use super::TRACING_TARGET_SHUTDOWN;

/// Resolves once SIGINT (Ctrl+C) or SIGTERM arrives.
///
/// Nothing enforces the drain timeout here; it is logged so operators
/// watching a slow drain know how long axum will wait.
pub async fn shutdown_signal(shutdown_timeout: Duration) {
    let received = wait_for_signal().await;

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        signal = received,
        drain_timeout_secs = shutdown_timeout.as_secs(),
        "shutdown signal received, draining connections"
    );
}

/// Races the interrupt and terminate handlers, returning the name of
/// whichever fired. A handler that cannot be installed is logged and
/// parked so the other one still works.
async fn wait_for_signal() -> &'static str {
    let interrupt = async {
        if let Err(err) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %err,
                "Ctrl+C handler unavailable"
            );
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %err,
                    "SIGTERM handler unavailable"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    }
}
