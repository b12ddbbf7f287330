//! Category repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Category, NewCategory};
use crate::{PgClient, PgError, PgResult, schema};

/// Repository for category database operations.
pub trait CategoryRepository {
    /// Creates a new category.
    fn create_category(
        &self,
        new_category: NewCategory,
    ) -> impl Future<Output = PgResult<Category>> + Send;

    /// Finds a category by its unique identifier.
    fn find_category_by_id(
        &self,
        category_id: i32,
    ) -> impl Future<Output = PgResult<Option<Category>>> + Send;

    /// Lists every category, ordered by name.
    fn list_categories(&self) -> impl Future<Output = PgResult<Vec<Category>>> + Send;
}

impl CategoryRepository for PgClient {
    async fn create_category(&self, new_category: NewCategory) -> PgResult<Category> {
        let mut conn = self.get_connection().await?;

        use schema::categories;

        let category = diesel::insert_into(categories::table)
            .values(&new_category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(category)
    }

    async fn find_category_by_id(&self, category_id: i32) -> PgResult<Option<Category>> {
        let mut conn = self.get_connection().await?;

        use schema::categories::{self, dsl};

        let category = categories::table
            .filter(dsl::category_id.eq(category_id))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(category)
    }

    async fn list_categories(&self) -> PgResult<Vec<Category>> {
        let mut conn = self.get_connection().await?;

        use schema::categories::{self, dsl};

        let categories = categories::table
            .order(dsl::name.asc())
            .select(Category::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(categories)
    }
}
