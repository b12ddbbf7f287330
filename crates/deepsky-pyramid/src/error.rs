//! Pyramid generation error types.

/// Result type for pyramid operations.
pub type PyramidResult<T> = Result<T, PyramidError>;

/// Errors that can occur while generating or reading a pyramid.
#[derive(Debug, thiserror::Error)]
pub enum PyramidError {
    /// Source bytes could not be decoded as a raster image.
    ///
    /// Decode failures abort ingestion before anything is written.
    #[error("image decode failed: {0}")]
    Decode(image::ImageError),

    /// A derived image could not be encoded.
    #[error("image encode failed: {0}")]
    Encode(image::ImageError),

    /// Staging directory I/O failed.
    #[error("staging io failed: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest could not be parsed.
    #[error("malformed manifest: {0}")]
    Manifest(String),
}
