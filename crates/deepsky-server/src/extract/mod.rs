//! Request extractors with normalized error responses.
//!
//! These wrap the stock axum extractors so that every rejection surfaces
//! as the catalog's `{"error": string}` wire shape instead of axum's
//! plain-text defaults.

mod path;
mod query;

pub use path::Path;
pub use query::Query;
