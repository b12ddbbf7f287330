//! Liveness endpoint.

use axum::Json;
use axum::routing::get;
use axum::Router;

use super::response::MonitorStatusResponse;
use crate::service::ServiceState;

async fn health_status() -> Json<MonitorStatusResponse> {
    Json(MonitorStatusResponse {
        is_healthy: true,
        updated_at: jiff::Timestamp::now(),
    })
}

/// Returns a [`Router`] with the health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/", get(health_status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn health_endpoint_reports_healthy() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/").await;
        response.assert_status_ok();

        let status = response.json::<MonitorStatusResponse>();
        assert!(status.is_healthy);

        let age = jiff::Timestamp::now() - status.updated_at;
        assert!(age.get_seconds() < 60);
        Ok(())
    }
}
