//! Sky point model.

use bigdecimal::BigDecimal;
use diesel::prelude::*;

use crate::schema::points;

/// A point of interest on an observation site, linked to a catalog image.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = points)]
#[diesel(primary_key(point_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Point {
    /// Unique point identifier
    pub point_id: i32,
    /// Site this point belongs to
    pub site_id: i32,
    /// Catalog image shown for this point
    pub image_id: i32,
    /// Latitude coordinate on the site backdrop
    pub latitude: BigDecimal,
    /// Longitude coordinate on the site backdrop
    pub longitude: BigDecimal,
}

/// Data for creating a new sky point.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = points)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPoint {
    /// Site this point belongs to
    pub site_id: i32,
    /// Catalog image shown for this point
    pub image_id: i32,
    /// Latitude coordinate on the site backdrop
    pub latitude: BigDecimal,
    /// Longitude coordinate on the site backdrop
    pub longitude: BigDecimal,
}
