use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Tracing target for error responses.
const TRACING_TARGET: &str = "scorebook_server::handler::response";

/// Body format of an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorFormat {
    /// `{"error": "<message>"}` with `application/json`.
    Json,
    /// The bare message with `text/plain`.
    PlainText,
}

/// HTTP error response representation.
///
/// Only the message reaches the client, serialized as `{"error": message}`.
/// The name and context are used for logging.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// User-friendly error message safe for client display
    #[serde(rename = "error")]
    pub message: Cow<'a, str>,

    /// The error name/type identifier
    #[serde(skip)]
    pub name: Cow<'a, str>,
    /// Internal context for debugging (optional, not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
    /// Body format (not serialized in JSON)
    #[serde(skip)]
    pub format: ErrorFormat,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const METHOD_NOT_ALLOWED: Self = Self::new(
        "method_not_allowed",
        "Method Not Allowed",
        StatusCode::METHOD_NOT_ALLOWED,
    )
    .with_format(ErrorFormat::PlainText);
    pub const MISSING_FIELDS: Self = Self::new(
        "missing_fields",
        "Missing required fields",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::new("not_found", "Not found", StatusCode::NOT_FOUND);
    pub const PAYLOAD_TOO_LARGE: Self = Self::new(
        "payload_too_large",
        "Payload too large",
        StatusCode::PAYLOAD_TOO_LARGE,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const UPLOAD_FAILED: Self = Self::new(
        "upload_failed",
        "Lỗi upload bảng điểm khảo sát",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            message: Cow::Borrowed(message),
            name: Cow::Borrowed(name),
            context: None,
            status,
            format: ErrorFormat::Json,
        }
    }

    /// Sets the body format.
    #[inline]
    pub const fn with_format(mut self, format: ErrorFormat) -> Self {
        self.format = format;
        self
    }

    /// Appends a detail to the existing message, separated by a colon.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        let detail = message.into();
        self.message = Cow::Owned(format!("{}: {}", self.message, detail));
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        tracing::warn!(
            target: TRACING_TARGET,
            status = %self.status,
            name = %self.name,
            message = %self.message,
            context = ?self.context,
            "HTTP error response"
        );

        match self.format {
            ErrorFormat::Json => (self.status, Json(self)).into_response(),
            ErrorFormat::PlainText => (self.status, self.message.into_owned()).into_response(),
        }
    }
}
