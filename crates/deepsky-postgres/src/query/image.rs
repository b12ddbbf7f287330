//! Catalog image repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::Pagination;
use crate::model::{Image, NewImage};
use crate::{PgClient, PgError, PgResult, schema};

/// Upper bound on rows scanned for a semantic search pass.
pub const SEARCH_SCAN_LIMIT: i64 = 500;

/// The subset of image columns needed to rank a semantic search.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = schema::images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImageEmbeddingRow {
    /// Unique image identifier
    pub image_id: i32,
    /// Display title
    pub title: String,
    /// Public URL of the resized preview
    pub preview_image_url: String,
    /// Comma-delimited embedding vector, if computed
    pub ai_description: Option<String>,
    /// Model tag the embedding was computed with
    pub embedding_model: Option<String>,
}

/// Repository for catalog image database operations.
///
/// The `create_image` insert is the final step of the publishing pipeline;
/// it must only run after every derived asset has been verified in object
/// storage.
pub trait ImageRepository {
    /// Creates a new catalog image record.
    fn create_image(&self, new_image: NewImage) -> impl Future<Output = PgResult<Image>> + Send;

    /// Finds an image by its unique identifier.
    fn find_image_by_id(
        &self,
        image_id: i32,
    ) -> impl Future<Output = PgResult<Option<Image>>> + Send;

    /// Finds an image together with its category name.
    fn find_image_with_category(
        &self,
        image_id: i32,
    ) -> impl Future<Output = PgResult<Option<(Image, String)>>> + Send;

    /// Lists images, newest first, optionally filtered by category.
    fn list_images(
        &self,
        category_id: Option<i32>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Image>>> + Send;

    /// Loads the embedding columns of recent images for semantic ranking.
    ///
    /// Bounded by [`SEARCH_SCAN_LIMIT`]; ranking happens in memory.
    fn list_images_for_search(
        &self,
    ) -> impl Future<Output = PgResult<Vec<ImageEmbeddingRow>>> + Send;
}

impl ImageRepository for PgClient {
    async fn create_image(&self, new_image: NewImage) -> PgResult<Image> {
        let mut conn = self.get_connection().await?;

        use schema::images;

        let image = diesel::insert_into(images::table)
            .values(&new_image)
            .returning(Image::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(image)
    }

    async fn find_image_by_id(&self, image_id: i32) -> PgResult<Option<Image>> {
        let mut conn = self.get_connection().await?;

        use schema::images::{self, dsl};

        let image = images::table
            .filter(dsl::image_id.eq(image_id))
            .select(Image::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(image)
    }

    async fn find_image_with_category(&self, image_id: i32) -> PgResult<Option<(Image, String)>> {
        let mut conn = self.get_connection().await?;

        use schema::{categories, images};

        let row = images::table
            .inner_join(categories::table)
            .filter(images::dsl::image_id.eq(image_id))
            .select((Image::as_select(), categories::dsl::name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row)
    }

    async fn list_images(
        &self,
        category_id: Option<i32>,
        pagination: Pagination,
    ) -> PgResult<Vec<Image>> {
        let mut conn = self.get_connection().await?;

        use schema::images::{self, dsl};

        let mut query = images::table.into_boxed();

        if let Some(category_id) = category_id {
            query = query.filter(dsl::category_id.eq(category_id));
        }

        let images = query
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Image::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(images)
    }

    async fn list_images_for_search(&self) -> PgResult<Vec<ImageEmbeddingRow>> {
        let mut conn = self.get_connection().await?;

        use schema::images::{self, dsl};

        let rows = images::table
            .order(dsl::created_at.desc())
            .limit(SEARCH_SCAN_LIMIT)
            .select(ImageEmbeddingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }
}
