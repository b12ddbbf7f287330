//! Database query repositories for the catalog entities.
//!
//! Repositories are traits implemented on [`PgClient`], giving call sites a
//! narrow, mockable surface per entity.
//!
//! # Pagination
//!
//! Queries that may return large result sets take a [`Pagination`] to keep
//! result sizes bounded.
//!
//! [`PgClient`]: crate::PgClient

pub mod category;
pub mod image;
pub mod point;
pub mod site;

pub use category::CategoryRepository;
pub use image::{ImageEmbeddingRow, ImageRepository};
pub use point::PointRepository;
use serde::{Deserialize, Serialize};
pub use site::SiteRepository;

/// Pagination parameters for database queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of records to return.
    pub limit: i64,
    /// Number of records to skip.
    pub offset: i64,
}

impl Pagination {
    /// Creates a new pagination instance.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            // Ensure limit is between 1 and 100
            limit: limit.clamp(1, 100),
            // Ensure offset is non-negative
            offset: offset.max(0),
        }
    }

    /// Creates pagination from a 1-based page number and page size.
    pub fn from_page(page: i64, page_size: i64) -> Self {
        let page = page.max(1);
        let page_size = page_size.clamp(1, 100);
        Self::new(page_size, (page - 1) * page_size)
    }

    /// Gets the current page number (1-based).
    pub fn page_number(&self) -> i64 {
        (self.offset / self.limit) + 1
    }

    /// Gets the page size.
    pub fn page_size(&self) -> i64 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(15, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_bounds_checking() {
        let pagination = Pagination::new(0, 10);
        assert_eq!(pagination.limit, 1);

        let pagination = Pagination::new(500, 10);
        assert_eq!(pagination.limit, 100);

        let pagination = Pagination::new(10, -5);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_from_page() {
        let pagination = Pagination::from_page(1, 15);
        assert_eq!(pagination.limit, 15);
        assert_eq!(pagination.offset, 0);

        let pagination = Pagination::from_page(3, 15);
        assert_eq!(pagination.offset, 30);
        assert_eq!(pagination.page_number(), 3);

        // Page numbers below 1 snap to the first page.
        let pagination = Pagination::from_page(0, 15);
        assert_eq!(pagination.offset, 0);
    }

    #[test]
    fn pagination_default_matches_catalog_page_size() {
        assert_eq!(Pagination::default().limit, 15);
    }
}
