//! Category catalog handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use deepsky_postgres::PgClient;
use deepsky_postgres::query::CategoryRepository;

use super::Result;
use super::response::CategoryResponse;
use crate::service::ServiceState;

async fn list_categories(State(pg_client): State<PgClient>) -> Result<Json<Vec<CategoryResponse>>> {
    let categories = pg_client.list_categories().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Returns a [`Router`] with the category routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/", get(list_categories))
}
