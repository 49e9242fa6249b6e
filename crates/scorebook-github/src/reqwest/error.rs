//! Error types for the reqwest-based GitHub client.

use thiserror::Error;

use crate::ErrorKind;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Endpoint address could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// The API answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, or the status reason.
        message: String,
        /// Whether the rate limit was exhausted.
        rate_limited: bool,
    },
}

/// Classifies a GitHub API error response.
pub(crate) fn kind_for_status(status: u16, message: &str, rate_limited: bool) -> ErrorKind {
    match status {
        401 => ErrorKind::Authentication,
        403 if rate_limited => ErrorKind::RateLimited,
        403 => ErrorKind::Authorization,
        429 => ErrorKind::RateLimited,
        404 => ErrorKind::NotFound,
        409 => ErrorKind::Conflict,
        // Unprocessable entity covers both sha mismatches and malformed input.
        422 if message.to_ascii_lowercase().contains("sha") => ErrorKind::Conflict,
        422 => ErrorKind::InvalidInput,
        500..=599 => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::ExternalError,
    }
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    crate::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    crate::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    crate::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => crate::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Url(e) => crate::Error::new(ErrorKind::Configuration)
                .with_message(e.to_string())
                .with_source(e),
            Error::Config(message) => {
                crate::Error::new(ErrorKind::Configuration).with_message(message)
            }
            Error::Status {
                status,
                message,
                rate_limited,
            } => crate::Error::new(kind_for_status(status, &message, rate_limited))
                .with_context(format!("status {status}"))
                .with_message(message),
        }
    }
}
