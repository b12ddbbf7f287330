//! Observation site model.

use diesel::prelude::*;

use crate::schema::sites;

/// An observation site that sky points are pinned onto.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sites)]
#[diesel(primary_key(site_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Site {
    /// Unique site identifier
    pub site_id: i32,
    /// Display name
    pub name: String,
    /// Public URL of the site backdrop image
    pub image_url: String,
}

/// Data for creating a new observation site.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewSite {
    /// Display name
    pub name: String,
    /// Public URL of the site backdrop image
    pub image_url: String,
}
