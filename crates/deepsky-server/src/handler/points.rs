//! Sky point handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use deepsky_postgres::PgClient;
use deepsky_postgres::query::{CategoryRepository, PointRepository};

use super::response::{PointDetailResponse, PointSummaryResponse, SitePointsResponse};
use super::{ErrorKind, Result};
use crate::extract::Path;
use crate::service::{PreviewResolver, ServiceState};

async fn site_points(
    State(pg_client): State<PgClient>,
    Path(site_id): Path<i32>,
) -> Result<Json<SitePointsResponse>> {
    let rows = pg_client.list_site_points(site_id).await?;

    let points = rows
        .into_iter()
        .map(|(point, image_title)| PointSummaryResponse::new(point, image_title))
        .collect();

    Ok(Json(SitePointsResponse { points }))
}

async fn point_detail(
    State(pg_client): State<PgClient>,
    State(previews): State<PreviewResolver>,
    Path(point_id): Path<i32>,
) -> Result<Json<PointDetailResponse>> {
    let (point, image, _site_name) = pg_client
        .find_point_detail(point_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Point not found"))?;

    let category = pg_client
        .find_category_by_id(image.category_id)
        .await?
        .map(|category| category.name)
        .unwrap_or_default();

    let image_base64 = previews.data_uri(&image.preview_image_url).await;

    Ok(Json(PointDetailResponse {
        point_id: point.point_id,
        site_id: point.site_id,
        image_id: image.image_id,
        title: image.title,
        description: image.description,
        category,
        image_base64,
    }))
}

/// Returns a [`Router`] with the sky point routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/site/{site_id}", get(site_points))
        .route("/{point_id}", get(point_detail))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn non_numeric_point_id_is_a_bad_request() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/points/site/abc").await;
        response.assert_status_bad_request();
        Ok(())
    }
}
