//! Server error types with recovery suggestions.

use std::io;

use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Error raised while starting or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// Runtime server error.
    #[error("Runtime error: {0}")]
    Runtime(#[source] io::Error),
}

impl ServerError {
    /// Creates a bind error with address context.
    pub fn bind_error(address: impl ToString, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_string(),
            source,
        }
    }

    /// Returns the underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::BindError { source, .. } => source,
            Self::Runtime(err) => err,
        }
    }

    /// Provides a human-readable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.io_error().kind() {
            io::ErrorKind::PermissionDenied => {
                Some("Try using a port above 1024 or run with appropriate privileges")
            }
            io::ErrorKind::AddrInUse => Some(
                "The port is already in use. Try a different port or stop the conflicting service",
            ),
            io::ErrorKind::AddrNotAvailable => {
                Some("The address is not available. Check network interface configuration")
            }
            _ if matches!(self, Self::BindError { .. }) => {
                Some("Check network configuration and firewall settings")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_errors_have_suggestions() {
        let err = ServerError::bind_error(
            "127.0.0.1:3000",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        );

        assert!(err.to_string().starts_with("Failed to bind to 127.0.0.1:3000"));
        assert!(err.suggestion().unwrap().contains("already in use"));

        let other = ServerError::bind_error("127.0.0.1:3000", io::Error::other("boom"));
        assert!(other.suggestion().is_some());
    }

    #[test]
    fn runtime_errors_without_known_cause() {
        let err = ServerError::Runtime(io::Error::other("boom"));
        assert!(err.suggestion().is_none());
        assert_eq!(err.io_error().kind(), io::ErrorKind::Other);
    }
}
