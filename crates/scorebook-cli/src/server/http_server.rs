//! HTTP server startup.

use axum::Router;
use tokio::net::TcpListener;

use super::lifecycle::serve_with_shutdown;
use super::{ServerError, ServerResult, shutdown_signal};
use crate::TRACING_TARGET_SERVER_STARTUP;
use crate::config::ServerConfig;

/// Binds to the configured address and serves `app` until a shutdown
/// signal arrives.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(app: Router, server_config: ServerConfig) -> ServerResult<()> {
    let server_addr = server_config.server_addr();

    let listener = TcpListener::bind(server_addr).await.map_err(|err| {
        let err = ServerError::bind_error(server_addr, err);
        tracing::error!(
            target: TRACING_TARGET_SERVER_STARTUP,
            addr = %server_addr,
            error = %err,
            suggestion = err.suggestion(),
            "Failed to bind to address"
        );
        err
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_addr,
        "Server is ready and listening for connections"
    );

    let shutdown = shutdown_signal(server_config.shutdown_timeout());
    serve_with_shutdown(&server_config, || async move {
        axum::serve(listener, app).with_graceful_shutdown(shutdown).await
    })
    .await
}
