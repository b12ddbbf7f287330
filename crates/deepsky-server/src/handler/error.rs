//! HTTP error type shared by all handlers.
//!
//! Infrastructure errors are converted into this type at the handler
//! boundary. The wire shape is a single `{"error": string}` object with a
//! 400, 404, or 500 status; internal detail stays in the logs.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use deepsky_opendal::StorageError;
use deepsky_postgres::PgError;
use deepsky_pyramid::PyramidError;
use deepsky_rig::EmbedError;
use serde_json::json;

use crate::pipeline::PipelineError;
use crate::service::ServiceError;

/// Tracing target for handler errors.
const TRACING_TARGET: &str = "deepsky_server::handler::error";

/// Specialized [`Result`] type for handler operations.
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Classified error kinds with their HTTP mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete request input.
    BadRequest,
    /// The referenced resource does not exist.
    NotFound,
    /// Any internal failure; never exposes detail to the client.
    InternalServerError,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    pub fn status_code(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Default client-facing message for this kind.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "Bad request",
            Self::NotFound => "Not found",
            Self::InternalServerError => "Internal server error",
        }
    }

    /// Creates an [`Error`] of this kind with a client-facing message.
    pub fn with_message(self, message: impl Into<Cow<'static, str>>) -> Error<'static> {
        Error::new(self).with_message(message)
    }

    /// Creates an [`Error`] of this kind with log-only context.
    pub fn with_context(self, context: impl Into<Cow<'static, str>>) -> Error<'static> {
        Error::new(self).with_context(context)
    }
}

impl IntoResponse for ErrorKind {
    fn into_response(self) -> Response {
        Error::new(self).into_response()
    }
}

/// HTTP error with an optional client-facing message and log-only context.
#[must_use = "errors do nothing unless returned"]
#[derive(Debug, Clone)]
pub struct Error<'a> {
    kind: ErrorKind,
    message: Option<Cow<'a, str>>,
    context: Option<Cow<'a, str>>,
}

impl<'a> Error<'a> {
    /// Creates a new error of the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: None,
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Sets the client-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets context that is logged but never sent to the client.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// The message the client will receive.
    pub fn message(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

impl std::fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())?;
        if let Some(context) = self.context.as_deref() {
            write!(f, " ({context})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if status.is_server_error() {
            tracing::error!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                message = self.message(),
                context = self.context.as_deref().unwrap_or(""),
                "request failed"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET,
                status = status.as_u16(),
                message = self.message(),
                context = self.context.as_deref().unwrap_or(""),
                "request rejected"
            );
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<PgError> for Error<'static> {
    fn from(err: PgError) -> Self {
        if err.is_not_found() {
            return ErrorKind::NotFound.with_context(err.to_string());
        }
        ErrorKind::InternalServerError.with_context(err.to_string())
    }
}

impl From<StorageError> for Error<'static> {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ErrorKind::NotFound.with_context(err.to_string()),
            other => ErrorKind::InternalServerError.with_context(other.to_string()),
        }
    }
}

impl From<PyramidError> for Error<'static> {
    fn from(err: PyramidError) -> Self {
        match err {
            PyramidError::Decode(_) => ErrorKind::BadRequest
                .with_message("Unsupported or corrupt image file")
                .with_context(err.to_string()),
            other => ErrorKind::InternalServerError.with_context(other.to_string()),
        }
    }
}

impl From<EmbedError> for Error<'static> {
    fn from(err: EmbedError) -> Self {
        ErrorKind::InternalServerError.with_context(err.to_string())
    }
}

impl From<deepsky_core::EmbeddingError> for Error<'static> {
    fn from(err: deepsky_core::EmbeddingError) -> Self {
        ErrorKind::InternalServerError.with_context(err.to_string())
    }
}

impl From<PipelineError> for Error<'static> {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(message) => ErrorKind::BadRequest.with_message(message),
            PipelineError::Pyramid(inner) => inner.into(),
            other => ErrorKind::InternalServerError.with_context(other.to_string()),
        }
    }
}

impl From<ServiceError> for Error<'static> {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Postgres(inner) => inner.into(),
            ServiceError::Storage(inner) => inner.into(),
            ServiceError::Embed(inner) => inner.into(),
            ServiceError::Embedding(inner) => inner.into(),
            ServiceError::Config(message) => {
                ErrorKind::InternalServerError.with_context(message)
            }
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for Error<'static> {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ErrorKind::BadRequest
            .with_message("Malformed multipart request")
            .with_context(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for Error<'static> {
    fn from(err: axum::extract::multipart::MultipartRejection) -> Self {
        ErrorKind::BadRequest
            .with_message("Expected a multipart/form-data request")
            .with_context(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_messages_per_kind() {
        assert_eq!(Error::new(ErrorKind::NotFound).message(), "Not found");
        assert_eq!(
            Error::new(ErrorKind::InternalServerError).message(),
            "Internal server error"
        );
    }

    #[test]
    fn context_stays_out_of_the_message() {
        let error = ErrorKind::InternalServerError.with_context("pool exhausted");
        assert_eq!(error.message(), "Internal server error");
    }

    #[test]
    fn decode_failures_map_to_bad_request() {
        let decode = image::load_from_memory(b"not an image").unwrap_err();
        let error: Error<'static> = PyramidError::Decode(decode).into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn missing_row_maps_to_not_found() {
        let error: Error<'static> =
            PgError::Query(deepsky_postgres::error::DieselError::NotFound).into();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
