//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security: CORS and request body limits.
//! - Observability: request IDs and tracing spans.
//! - Recovery: panics, timeouts, and Tower service errors.

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt};
