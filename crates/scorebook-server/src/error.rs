//! Service layer error types and utilities.
//!
//! Errors carry a kind for categorization, a human-readable message and an
//! optional source. The message is what clients see when an upload fails.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// Type alias for boxed errors that are Send + Sync.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result type alias for service layer operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error kind enumeration for categorizing service layer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Configuration-related errors.
    Config,
    /// The request carried content that cannot be stored.
    InvalidInput,
    /// The content store rejected or failed an operation.
    External,
    /// Index (de)serialization errors.
    Serialization,
    /// Internal service logic errors.
    Internal,
}

impl ErrorKind {
    /// Returns the error kind as a string for categorization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::InvalidInput => "invalid_input",
            Self::External => "external_service",
            Self::Serialization => "serialization",
            Self::Internal => "internal_service",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service layer error with structured information.
#[derive(Debug, thiserror::Error)]
#[error("{kind} error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxedError>,
}

impl Error {
    #[inline]
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches a source error to this error.
    #[inline]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error kind.
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message.
    #[must_use]
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    /// Creates a content store error.
    pub fn external(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::External, message)
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl From<scorebook_github::Error> for Error {
    fn from(error: scorebook_github::Error) -> Self {
        use scorebook_github::ErrorKind as StoreErrorKind;

        let kind = match error.kind {
            StoreErrorKind::Configuration => ErrorKind::Config,
            _ => ErrorKind::External,
        };

        let message = error.message_or_kind().to_owned();
        Self::new(kind, message).with_source(error)
    }
}

impl From<scorebook_github::reqwest::Error> for Error {
    fn from(error: scorebook_github::reqwest::Error) -> Self {
        scorebook_github::Error::from(error).into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_keeps_message() {
        let error: Error = scorebook_github::Error::not_found()
            .with_message("Not Found")
            .into();

        assert_eq!(error.kind(), ErrorKind::External);
        assert_eq!(error.message(), "Not Found");
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn test_store_error_without_message_uses_kind() {
        let error: Error = scorebook_github::Error::new(scorebook_github::ErrorKind::Configuration).into();

        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.message(), "configuration");
    }

    #[test]
    fn test_internal_error_keeps_source() {
        let source = std::io::Error::other("task aborted");
        let error = Error::internal("upload task failed").with_source(source);

        assert_eq!(error.kind(), ErrorKind::Internal);
        assert_eq!(error.kind().as_str(), "internal_service");
        assert!(StdError::source(&error).is_some());
    }

    #[test]
    fn test_display() {
        let error = Error::invalid_input("file payload is not valid base64");
        assert_eq!(
            error.to_string(),
            "invalid_input error: file payload is not valid base64"
        );
    }
}
