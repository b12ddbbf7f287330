//! All `axum::`[`Router`]s with related handlers.
//!
//! [`Router`]: axum::routing::Router

mod categories;
mod error;
mod images;
mod monitors;
mod points;
pub mod response;
mod sites;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all catalog routes and the given state applied.
///
/// [`Router`]: axum::routing::Router
pub fn routes(state: ServiceState) -> Router {
    Router::new()
        .merge(monitors::routes())
        .nest("/categories", categories::routes())
        .nest("/sites", sites::routes())
        .nest("/images", images::routes())
        .nest("/points", points::routes())
        .fallback(fallback)
        .with_state(state)
}

#[cfg(test)]
mod test {
    use axum_test::TestServer;

    use super::routes;
    use crate::service::{ServiceConfig, ServiceState};

    /// Returns a new [`TestServer`] over the full router with development
    /// state (in-memory storage, lazy database pool).
    pub fn create_test_server() -> anyhow::Result<TestServer> {
        let state = ServiceState::from_config(&ServiceConfig::default())?;
        let server = TestServer::new(routes(state))?;
        Ok(server)
    }

    #[tokio::test]
    async fn unknown_routes_fall_back_to_not_found() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/nope").await;
        response.assert_status_not_found();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Not found");
        Ok(())
    }
}
