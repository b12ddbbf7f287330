//! Observation site repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewSite, Site};
use crate::{PgClient, PgError, PgResult, schema};

/// Repository for observation site database operations.
pub trait SiteRepository {
    /// Creates a new observation site.
    fn create_site(&self, new_site: NewSite) -> impl Future<Output = PgResult<Site>> + Send;

    /// Finds a site by its unique identifier.
    fn find_site_by_id(&self, site_id: i32) -> impl Future<Output = PgResult<Option<Site>>> + Send;

    /// Lists every site, ordered by name.
    fn list_sites(&self) -> impl Future<Output = PgResult<Vec<Site>>> + Send;
}

impl SiteRepository for PgClient {
    async fn create_site(&self, new_site: NewSite) -> PgResult<Site> {
        let mut conn = self.get_connection().await?;

        use schema::sites;

        let site = diesel::insert_into(sites::table)
            .values(&new_site)
            .returning(Site::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(site)
    }

    async fn find_site_by_id(&self, site_id: i32) -> PgResult<Option<Site>> {
        let mut conn = self.get_connection().await?;

        use schema::sites::{self, dsl};

        let site = sites::table
            .filter(dsl::site_id.eq(site_id))
            .select(Site::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(site)
    }

    async fn list_sites(&self) -> PgResult<Vec<Site>> {
        let mut conn = self.get_connection().await?;

        use schema::sites::{self, dsl};

        let sites = sites::table
            .order(dsl::name.asc())
            .select(Site::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(sites)
    }
}
