//! Response payloads for all catalog endpoints.
//!
//! Field names stay camelCase on the wire to match the catalog's existing
//! clients.

use bigdecimal::ToPrimitive;
use deepsky_postgres::model::{Category, Image, Point};
use serde::{Deserialize, Serialize};

/// Service health summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatusResponse {
    /// Whether the service considers itself healthy.
    pub is_healthy: bool,
    /// When the status was computed.
    pub updated_at: jiff::Timestamp,
}

/// One catalog category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub category_id: i32,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.category_id,
            name: category.name,
        }
    }
}

/// One sky site in the listing, with its image inlined as a data URI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummaryResponse {
    pub site_id: i32,
    pub name: String,
    pub image_url: String,
}

/// Detail view of one sky site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetailResponse {
    pub name: String,
    pub image_base64: String,
}

/// One catalog image in a paged listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummaryResponse {
    pub image_id: i32,
    pub title: String,
    pub base64: String,
}

/// Detail view of one catalog image; `image_url` points at the deep-zoom
/// manifest on the public bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetailResponse {
    pub title: String,
    pub description: String,
    pub image_url: String,
}

/// Card view of one catalog image with its category name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCardResponse {
    pub image_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_base64: String,
}

/// Summary of a freshly ingested image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImageResponse {
    pub image_id: i32,
    pub title: String,
    pub preview_image_url: String,
    pub full_image_url: String,
}

impl From<Image> for UploadedImageResponse {
    fn from(image: Image) -> Self {
        Self {
            image_id: image.image_id,
            title: image.title,
            preview_image_url: image.preview_image_url,
            full_image_url: image.full_image_url,
        }
    }
}

/// One semantic search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultResponse {
    pub image_id: i32,
    pub title: String,
    pub base64: String,
    pub similarity: f64,
}

/// All points on a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitePointsResponse {
    pub points: Vec<PointSummaryResponse>,
}

/// One point on a site with its image title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointSummaryResponse {
    pub point_id: i32,
    pub point_lat: f64,
    pub point_lng: f64,
    pub image_title: String,
}

impl PointSummaryResponse {
    /// Builds a summary from a point and its image title.
    pub fn new(point: Point, image_title: String) -> Self {
        Self {
            point_id: point.point_id,
            point_lat: point.latitude.to_f64().unwrap_or_default(),
            point_lng: point.longitude.to_f64().unwrap_or_default(),
            image_title,
        }
    }
}

/// Detail view of one point with its catalog image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDetailResponse {
    pub point_id: i32,
    pub site_id: i32,
    pub image_id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_base64: String,
}
