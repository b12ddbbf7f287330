//! Sky site handlers.

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;
use deepsky_postgres::PgClient;
use deepsky_postgres::query::SiteRepository;

use super::response::{SiteDetailResponse, SiteSummaryResponse};
use super::{ErrorKind, Result};
use crate::extract::Path;
use crate::service::{PreviewResolver, ServiceState};

async fn list_sites(
    State(pg_client): State<PgClient>,
    State(previews): State<PreviewResolver>,
) -> Result<Json<Vec<SiteSummaryResponse>>> {
    let sites = pg_client.list_sites().await?;

    let items = sites
        .into_iter()
        .map(|site| {
            let key = site.image_url.clone();
            (site, key)
        })
        .collect();

    let resolved = previews.resolve_many(items).await;
    let response = resolved
        .into_iter()
        .map(|(site, image_url)| SiteSummaryResponse {
            site_id: site.site_id,
            name: site.name,
            image_url,
        })
        .collect();

    Ok(Json(response))
}

async fn get_site(
    State(pg_client): State<PgClient>,
    State(previews): State<PreviewResolver>,
    Path(site_id): Path<i32>,
) -> Result<Json<SiteDetailResponse>> {
    let site = pg_client
        .find_site_by_id(site_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Site not found"))?;

    let image_base64 = previews.data_uri(&site.image_url).await;

    Ok(Json(SiteDetailResponse {
        name: site.name,
        image_base64,
    }))
}

/// Returns a [`Router`] with the sky site routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(list_sites))
        .route("/{site_id}", get(get_site))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn non_numeric_site_id_is_a_bad_request() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/sites/not-a-number").await;
        response.assert_status_bad_request();

        let body = response.json::<serde_json::Value>();
        assert!(body.get("error").is_some());
        Ok(())
    }
}
