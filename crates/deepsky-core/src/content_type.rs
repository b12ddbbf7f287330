//! Content types for published artifacts.

/// Content type for tiles, previews, and the full copy.
pub const CONTENT_TYPE_JPEG: &str = "image/jpeg";

/// Content type for PNG previews.
pub const CONTENT_TYPE_PNG: &str = "image/png";

/// Content type for the deep-zoom manifest.
pub const CONTENT_TYPE_XML: &str = "application/xml";

/// Resolves the content type for a preview key from its extension.
///
/// Preview keys keep the uploaded file's extension even though the bytes are
/// always JPEG; readers of legacy catalog entries rely on the `.png` mapping.
pub fn preview_content_type(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some(ext) if ext.eq_ignore_ascii_case("png") => CONTENT_TYPE_PNG,
        _ => CONTENT_TYPE_JPEG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_extension_maps_to_png() {
        assert_eq!(preview_content_type("images/a/resized.png"), CONTENT_TYPE_PNG);
    }

    #[test]
    fn everything_else_is_jpeg() {
        assert_eq!(preview_content_type("images/a/resized.jpg"), CONTENT_TYPE_JPEG);
        assert_eq!(preview_content_type("images/a/full"), CONTENT_TYPE_JPEG);
    }
}
