//! JSON extractor with improved error handling.
//!
//! This module provides [`Json`], a replacement for [`axum::Json`] whose
//! rejections are converted into the server's [`Error`] type.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Json as AxumJson, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::handler::{Error, ErrorKind};

/// Tracing target for request body extraction.
const TRACING_TARGET: &str = "scorebook_server::extract::json";

/// JSON extractor and response.
///
/// Unlike [`axum::Json`] the body is parsed whatever its `Content-Type`.
/// A body that cannot be read or decoded is an upload failure (`500`), except
/// for bodies over the [`DefaultBodyLimit`], which get `413`.
///
/// [`DefaultBodyLimit`]: axum::extract::DefaultBodyLimit
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Creates a new [`Json`] wrapper around the provided value.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;

        serde_json::from_slice::<T>(&bytes)
            .map(Self::new)
            .map_err(|error| {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    body_len = bytes.len(),
                    "Request body is not valid JSON"
                );

                ErrorKind::UploadFailed.with_message(sanitize_error_message(&error.to_string()))
            })
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<BytesRejection> for Error<'static> {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ErrorKind::PayloadTooLarge
                .into_error()
                .with_context(rejection.body_text());
        }

        ErrorKind::UploadFailed.with_message(sanitize_error_message(&rejection.body_text()))
    }
}

/// Keeps error messages short enough to return to clients.
fn sanitize_error_message(message: &str) -> String {
    let lines = message.lines().take(3).collect::<Vec<_>>();
    lines.join(" ").chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::routing::post;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::*;

    async fn echo(Json(value): Json<Value>) -> Json<Value> {
        Json(value)
    }

    #[tokio::test]
    async fn test_body_is_parsed_without_content_type() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/", post(echo)))?;

        let response = server.post("/").text(r#"{"year":2024}"#).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "year": 2024 }));
        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_body_is_upload_failure() -> anyhow::Result<()> {
        let server = TestServer::new(Router::new().route("/", post(echo)))?;

        let response = server.post("/").text("{not json").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({
            "error": "Lỗi upload bảng điểm khảo sát: key must be a string at line 1 column 2"
        }));
        Ok(())
    }

    #[test]
    fn test_sanitize_error_message() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_error_message(&long).len(), 200);
        assert_eq!(sanitize_error_message("a\nb\nc\nd"), "a b c");
    }
}
