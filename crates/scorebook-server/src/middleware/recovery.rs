//! Recovery middleware turning handler panics into error responses.
//!
//! No request timeout is layered here: an upload is a sequence of remote
//! writes, and each outbound call is already bounded by the content store's
//! HTTP timeout.

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "scorebook_server::recovery::panic";

type Panic = Box<dyn Any + Send + 'static>;

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers panic recovery, converting panics in handlers into `500`
    /// responses.
    fn with_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self) -> Self {
        self.layer(CatchPanicLayer::custom(catch_panic))
    }
}

fn catch_panic(err: Panic) -> Response {
    if let Some(error) = err.downcast_ref::<Error>() {
        tracing::error!(
            target: TRACING_TARGET_PANIC,
            error = %error,
            "service panic"
        );
        return error.clone().into_response();
    }

    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "service panic"
    );

    Error::new(ErrorKind::InternalServerError).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    async fn panicking() -> &'static str {
        panic!("handler exploded")
    }

    async fn ok() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/panic", get(panicking))
            .with_recovery();
        let server = TestServer::new(app)?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&serde_json::json!({ "error": "Internal server error" }));
        Ok(())
    }

    #[tokio::test]
    async fn test_successful_response_passes_through() -> anyhow::Result<()> {
        let app = Router::new().route("/ok", get(ok)).with_recovery();
        let server = TestServer::new(app)?;

        let response = server.get("/ok").await;
        response.assert_status_ok();
        response.assert_text("ok");
        Ok(())
    }
}
