//! Sky point repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{Image, NewPoint, Point};
use crate::{PgClient, PgError, PgResult, schema};

/// Repository for sky point database operations.
pub trait PointRepository {
    /// Creates a new sky point.
    fn create_point(&self, new_point: NewPoint) -> impl Future<Output = PgResult<Point>> + Send;

    /// Lists every point on a site, paired with the title of its catalog
    /// image.
    fn list_site_points(
        &self,
        site_id: i32,
    ) -> impl Future<Output = PgResult<Vec<(Point, String)>>> + Send;

    /// Finds a point together with its catalog image and site name.
    fn find_point_detail(
        &self,
        point_id: i32,
    ) -> impl Future<Output = PgResult<Option<(Point, Image, String)>>> + Send;
}

impl PointRepository for PgClient {
    async fn create_point(&self, new_point: NewPoint) -> PgResult<Point> {
        let mut conn = self.get_connection().await?;

        use schema::points;

        let point = diesel::insert_into(points::table)
            .values(&new_point)
            .returning(Point::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(point)
    }

    async fn list_site_points(&self, site_id: i32) -> PgResult<Vec<(Point, String)>> {
        let mut conn = self.get_connection().await?;

        use schema::{images, points};

        let rows = points::table
            .inner_join(images::table)
            .filter(points::dsl::site_id.eq(site_id))
            .order(points::dsl::point_id.asc())
            .select((Point::as_select(), images::dsl::title))
            .load(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows)
    }

    async fn find_point_detail(&self, point_id: i32) -> PgResult<Option<(Point, Image, String)>> {
        let mut conn = self.get_connection().await?;

        use schema::{images, points, sites};

        let row = points::table
            .inner_join(images::table)
            .inner_join(sites::table)
            .filter(points::dsl::point_id.eq(point_id))
            .select((Point::as_select(), Image::as_select(), sites::dsl::name))
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(row)
    }
}
