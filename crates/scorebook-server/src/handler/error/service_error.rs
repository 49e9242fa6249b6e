//! Service error to HTTP error conversion implementation.

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "scorebook_server::handler::service";

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        use crate::ErrorKind as ServiceErrorKind;

        match error.kind() {
            ServiceErrorKind::Config | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind(),
                    "Upload failed"
                );
            }
            _ => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    error_kind = %error.kind(),
                    "Upload failed"
                );
            }
        }

        ErrorKind::UploadFailed
            .with_message(error.message().to_owned())
            .with_context(error.kind().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_becomes_upload_failure() {
        let error: HttpError = crate::Error::external("Bad credentials").into();

        assert_eq!(error.kind(), ErrorKind::UploadFailed);
        assert_eq!(
            error.response().message,
            "Lỗi upload bảng điểm khảo sát: Bad credentials"
        );
        assert_eq!(error.context(), Some("external_service"));
    }
}
