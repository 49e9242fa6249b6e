//! HTTP error handling with builder pattern for dynamic error responses.

use std::borrow::Cow;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::handler::response::ErrorResponse;

/// The error type for HTTP handlers in the server.
///
/// Each error has a [`ErrorKind`] that fixes its status code and base message,
/// an optional detail appended to that message, and optional context that is
/// logged but never sent to the client.
#[derive(Clone)]
#[must_use = "errors do nothing unless serialized"]
pub struct Error<'a> {
    kind: ErrorKind,
    context: Option<Cow<'a, str>>,
    message: Option<Cow<'a, str>>,
}

impl Error<'static> {
    /// Creates a new [`Error`] with the specified kind.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
            message: None,
        }
    }
}

impl<'a> Error<'a> {
    /// Attaches context information to the error.
    #[inline]
    pub fn with_context(self, context: impl Into<Cow<'a, str>>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Sets a detail message that is appended to the base message.
    #[inline]
    pub fn with_message(self, message: impl Into<Cow<'a, str>>) -> Self {
        Self {
            message: Some(message.into()),
            ..self
        }
    }

    /// Returns the error kind.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the context if present.
    #[inline]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the custom message if present.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Builds the client-facing response for this error.
    pub fn response(&self) -> ErrorResponse<'_> {
        let mut response = self.kind.response();

        if let Some(message) = self.message.as_deref() {
            response = response.with_message(message);
        }

        if let Some(context) = self.context.as_deref() {
            response = response.with_context(context);
        }

        response
    }
}

impl Default for Error<'static> {
    #[inline]
    fn default() -> Self {
        Self::new(ErrorKind::default())
    }
}

impl fmt::Debug for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.kind.response();

        let mut debug_struct = f.debug_struct("Error");
        debug_struct
            .field("kind", &self.kind)
            .field("name", &response.name)
            .field("status", &response.status);

        if let Some(ref context) = self.context {
            debug_struct.field("context", context);
        }

        if let Some(ref message) = self.message {
            debug_struct.field("custom_message", message);
        }

        debug_struct.finish()
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let response = self.response();
        write!(f, "{} ({}): {}", response.name, response.status, response.message)?;

        if let Some(ref context) = self.context {
            write!(f, " - {}", context)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error<'_> {}

impl IntoResponse for Error<'_> {
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

impl From<ErrorKind> for Error<'static> {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// A specialized [`Result`] type for HTTP operations.
///
/// [`Result`]: std::result::Result
pub type Result<T, E = Error<'static>> = std::result::Result<T, E>;

/// Enumeration of all HTTP error kinds the server produces.
#[must_use = "error kinds do nothing unless used to create errors"]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    // 4xx Client Errors
    /// 400 Bad Request - A required upload field is absent or falsy
    MissingFields,
    /// 404 Not Found - No route matches the request path
    NotFound,
    /// 405 Method Not Allowed - The route exists but not for this method
    MethodNotAllowed,
    /// 413 Payload Too Large - The body exceeds the configured limit
    PayloadTooLarge,

    // 5xx Server Errors
    /// 500 Internal Server Error - Storing the file or updating the index failed
    UploadFailed,
    /// 500 Internal Server Error - Unexpected server error
    #[default]
    InternalServerError,
}

impl ErrorKind {
    /// Converts this error kind into a full [`Error`].
    #[inline]
    pub fn into_error(self) -> Error<'static> {
        Error::new(self)
    }

    /// Creates an [`Error`] with the specified context.
    #[inline]
    pub fn with_context<'a>(self, context: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self,
            context: Some(context.into()),
            message: None,
        }
    }

    /// Creates an [`Error`] with the specified message.
    #[inline]
    pub fn with_message<'a>(self, message: impl Into<Cow<'a, str>>) -> Error<'a> {
        Error {
            kind: self,
            context: None,
            message: Some(message.into()),
        }
    }

    /// Returns the HTTP status code for this error kind.
    #[inline]
    pub fn status_code(self) -> StatusCode {
        self.response().status
    }

    /// Returns the internal representation of this error kind.
    #[inline]
    pub fn response(self) -> ErrorResponse<'static> {
        match self {
            Self::MissingFields => ErrorResponse::MISSING_FIELDS,
            Self::NotFound => ErrorResponse::NOT_FOUND,
            Self::MethodNotAllowed => ErrorResponse::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => ErrorResponse::PAYLOAD_TOO_LARGE,
            Self::UploadFailed => ErrorResponse::UPLOAD_FAILED,
            Self::InternalServerError => ErrorResponse::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.response().name.as_ref())
    }
}

impl IntoResponse for ErrorKind {
    #[inline]
    fn into_response(self) -> Response {
        self.response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_http_error() {
        let error = Error::default();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_from_kind() {
        let error = Error::from(ErrorKind::NotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn error_message_is_appended_to_base_message() {
        let error = ErrorKind::UploadFailed.with_message("Bad credentials");
        assert_eq!(
            error.response().message,
            "Lỗi upload bảng điểm khảo sát: Bad credentials"
        );
    }

    #[test]
    fn error_context_is_not_part_of_message() {
        let error = ErrorKind::MissingFields.with_context("year, file");
        assert_eq!(error.context(), Some("year, file"));
        assert_eq!(error.response().message, "Missing required fields");
    }

    #[test]
    fn error_display() {
        let error = ErrorKind::UploadFailed.with_message("expected value at line 1 column 1");
        assert_eq!(
            error.to_string(),
            "upload_failed (500 Internal Server Error): Lỗi upload bảng điểm khảo sát: expected value at line 1 column 1"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(ErrorKind::MissingFields.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ErrorKind::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ErrorKind::UploadFailed.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
