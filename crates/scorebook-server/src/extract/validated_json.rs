//! Validated JSON extractor with automatic validation.
//!
//! This module provides [`ValidateJson`], a JSON extractor that runs
//! `validator` validation after deserialization.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// Tracing target for request validation.
const TRACING_TARGET: &str = "scorebook_server::extract::validate";

/// JSON extractor with automatic validation using the `validator` crate.
///
/// Any validation failure is reported as `400 Missing required fields`; the
/// offending field names are logged but not returned.
///
/// Also see [`Json`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        data.validate()?;
        Ok(Self::new(data))
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        let fields = fields.join(", ");

        tracing::warn!(
            target: TRACING_TARGET,
            fields = %fields,
            "Request validation failed"
        );

        ErrorKind::MissingFields.with_context(fields)
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn test_validation_errors_become_missing_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("year", ValidationError::new("required"));
        errors.add("file", ValidationError::new("required"));

        let error = Error::from(errors);
        assert_eq!(error.kind(), ErrorKind::MissingFields);
        assert_eq!(error.context(), Some("file, year"));
    }
}
