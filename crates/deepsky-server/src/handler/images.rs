//! Catalog image handlers: listing, detail, ingestion, semantic search.

use axum::Json;
use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::get;
use bytes::Bytes;
use deepsky_postgres::PgClient;
use deepsky_postgres::query::{ImageRepository, Pagination};
use serde::Deserialize;

use super::response::{
    ImageCardResponse, ImageDetailResponse, ImageSummaryResponse, SearchResultResponse,
    UploadedImageResponse,
};
use super::{Error, ErrorKind, Result};
use crate::extract::{Path, Query};
use crate::pipeline::{IngestPipeline, IngestRequest};
use crate::service::{PreviewResolver, PublicBucketUrl, SemanticSearch, ServiceState};

/// Fixed page size of the image listing.
const CATALOG_PAGE_SIZE: i64 = 15;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListImagesQuery {
    page: Option<i64>,
    category_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    prompt: Option<String>,
}

async fn list_images(
    State(pg_client): State<PgClient>,
    State(previews): State<PreviewResolver>,
    Query(query): Query<ListImagesQuery>,
) -> Result<Json<Vec<ImageSummaryResponse>>> {
    let pagination = Pagination::from_page(query.page.unwrap_or(1), CATALOG_PAGE_SIZE);
    let images = pg_client.list_images(query.category_id, pagination).await?;

    let items = images
        .into_iter()
        .map(|image| {
            let key = image.preview_image_url.clone();
            ((image.image_id, image.title), key)
        })
        .collect();

    let resolved = previews.resolve_many(items).await;
    let response = resolved
        .into_iter()
        .map(|((image_id, title), base64)| ImageSummaryResponse {
            image_id,
            title,
            base64,
        })
        .collect();

    Ok(Json(response))
}

async fn get_image(
    State(pg_client): State<PgClient>,
    State(public_bucket): State<PublicBucketUrl>,
    Path(image_id): Path<i32>,
) -> Result<Json<ImageDetailResponse>> {
    let image = pg_client
        .find_image_by_id(image_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Image not found"))?;

    Ok(Json(ImageDetailResponse {
        title: image.title,
        description: image.description,
        image_url: public_bucket.join_key(&image.full_image_url),
    }))
}

async fn image_card(
    State(pg_client): State<PgClient>,
    State(previews): State<PreviewResolver>,
    Path(image_id): Path<i32>,
) -> Result<Json<ImageCardResponse>> {
    let (image, category) = pg_client
        .find_image_with_category(image_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_message("Image not found"))?;

    let image_base64 = previews.data_uri(&image.preview_image_url).await;

    Ok(Json(ImageCardResponse {
        image_id: image.image_id,
        title: image.title,
        description: image.description,
        category,
        image_base64,
    }))
}

async fn upload_image(
    State(pipeline): State<IngestPipeline>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadedImageResponse>)> {
    let request = parse_upload(multipart).await?;
    let image = pipeline.ingest(request).await?;
    Ok((StatusCode::CREATED, Json(image.into())))
}

async fn search_images(
    State(search): State<SemanticSearch>,
    State(previews): State<PreviewResolver>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResultResponse>>> {
    let prompt = query.prompt.unwrap_or_default();
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(ErrorKind::BadRequest.with_message("Prompt is required"));
    }

    let ranked = search.search(prompt).await.map_err(Error::from)?;

    let items = ranked
        .into_iter()
        .map(|ranked| {
            let key = ranked.item.preview_image_url.clone();
            (
                (ranked.item.image_id, ranked.item.title, ranked.similarity),
                key,
            )
        })
        .collect();

    let resolved = previews.resolve_many(items).await;
    let response = resolved
        .into_iter()
        .map(|((image_id, title, similarity), base64)| SearchResultResponse {
            image_id,
            title,
            base64,
            similarity,
        })
        .collect();

    Ok(Json(response))
}

/// Collects the multipart fields of an upload into an [`IngestRequest`].
async fn parse_upload(mut multipart: Multipart) -> Result<IngestRequest> {
    let mut file_name = String::new();
    let mut bytes = Bytes::new();
    let mut title = String::new();
    let mut description = String::new();
    let mut category_text = String::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "file" => {
                file_name = field.file_name().unwrap_or("upload").to_string();
                bytes = field.bytes().await?;
            }
            "title" => title = field.text().await?,
            "description" => description = field.text().await?,
            "categoryId" => category_text = field.text().await?,
            _ => {}
        }
    }

    let category_id = match category_text.trim() {
        "" => 0,
        text => text.parse::<i32>().map_err(|_| {
            ErrorKind::BadRequest.with_message("categoryId must be a positive integer")
        })?,
    };

    Ok(IngestRequest {
        file_name,
        bytes,
        title,
        description,
        category_id,
    })
}

/// Returns a [`Router`] with the catalog image routes.
///
/// The search route sits at `/images/ai` below this router's mount point,
/// preserving the `/images/images/ai` path existing clients call.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/", get(list_images).post(upload_image))
        .route("/images/ai", get(search_images))
        .route("/cardData/{image_id}", get(image_card))
        .route("/{image_id}", get(get_image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn search_without_a_prompt_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let response = server.get("/images/images/ai").await;
        response.assert_status_bad_request();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Prompt is required");
        Ok(())
    }

    #[tokio::test]
    async fn upload_with_missing_fields_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let form = axum_test::multipart::MultipartForm::new()
            .add_text("title", "Orion Nebula");
        let response = server.post("/images").multipart(form).await;
        response.assert_status_bad_request();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Missing required fields");
        Ok(())
    }

    #[tokio::test]
    async fn upload_with_bad_category_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let form = axum_test::multipart::MultipartForm::new()
            .add_text("title", "Orion Nebula")
            .add_text("description", "A stellar nursery")
            .add_text("categoryId", "nebulae")
            .add_part(
                "file",
                axum_test::multipart::Part::bytes(vec![1, 2, 3]).file_name("orion.png"),
            );
        let response = server.post("/images").multipart(form).await;
        response.assert_status_bad_request();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "categoryId must be a positive integer");
        Ok(())
    }

    #[tokio::test]
    async fn upload_with_undecodable_file_is_rejected() -> anyhow::Result<()> {
        let server = create_test_server()?;

        let form = axum_test::multipart::MultipartForm::new()
            .add_text("title", "Orion Nebula")
            .add_text("description", "A stellar nursery")
            .add_text("categoryId", "3")
            .add_part(
                "file",
                axum_test::multipart::Part::bytes(b"not an image".to_vec())
                    .file_name("orion.png"),
            );
        let response = server.post("/images").multipart(form).await;
        response.assert_status_bad_request();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["error"], "Unsupported or corrupt image file");
        Ok(())
    }
}
