//! Catalog image model.

use diesel::prelude::*;

use crate::schema::images;

/// A published catalog image with its storage URLs and optional embedding.
///
/// A row exists only once every derived asset of the image has been
/// verified in object storage; the insert acts as the publish commit
/// marker.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = images)]
#[diesel(primary_key(image_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Image {
    /// Unique image identifier
    pub image_id: i32,
    /// Display title
    pub title: String,
    /// Human-written description
    pub description: String,
    /// Category this image belongs to
    pub category_id: i32,
    /// Public URL of the resized preview
    pub preview_image_url: String,
    /// Public URL of the full-resolution copy
    pub full_image_url: String,
    /// Comma-delimited embedding vector of the description, if computed
    pub ai_description: Option<String>,
    /// Model tag the embedding was computed with
    pub embedding_model: Option<String>,
    /// Timestamp the catalog row was committed
    pub created_at: jiff_diesel::Timestamp,
}

/// Data for creating a new catalog image.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = images)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewImage {
    /// Display title
    pub title: String,
    /// Human-written description
    pub description: String,
    /// Category this image belongs to
    pub category_id: i32,
    /// Public URL of the resized preview
    pub preview_image_url: String,
    /// Public URL of the full-resolution copy
    pub full_image_url: String,
    /// Comma-delimited embedding vector of the description, if computed
    pub ai_description: Option<String>,
    /// Model tag the embedding was computed with
    pub embedding_model: Option<String>,
}
