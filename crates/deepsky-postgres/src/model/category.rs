//! Category model for grouping catalog images.

use diesel::prelude::*;

use crate::schema::categories;

/// A category grouping catalog images, e.g. nebulae or galaxies.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(primary_key(category_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    /// Unique category identifier
    pub category_id: i32,
    /// Display name
    pub name: String,
}

/// Data for creating a new category.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCategory {
    /// Display name
    pub name: String,
}
