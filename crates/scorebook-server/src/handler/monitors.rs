//! Health check handler.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use jiff::Timestamp;
use scorebook_github::ContentStoreService;

use super::response::HealthResponse;
use crate::extract::Json;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "scorebook_server::handler::monitors";

#[tracing::instrument(skip_all)]
async fn health_status(
    State(content_store): State<ContentStoreService>,
) -> (StatusCode, Json<HealthResponse>) {
    let response = match content_store.health_check().await {
        Ok(health) => HealthResponse {
            healthy: health.is_healthy(),
            response_time_ms: health.response.map(|d| d.as_millis() as u64),
            checked_at: health.checked_at,
        },
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Content store health check failed"
            );
            HealthResponse {
                healthy: false,
                response_time_ms: None,
                checked_at: Timestamp::now(),
            }
        }
    };

    let status_code = if response.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(
        target: TRACING_TARGET,
        healthy = response.healthy,
        status_code = status_code.as_u16(),
        "Health status response prepared"
    );

    (status_code, Json(response))
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use scorebook_github::memory::MemoryStore;

    use super::*;
    use crate::handler::test::create_test_server_with_store;

    #[tokio::test]
    async fn test_health_status_endpoint() -> anyhow::Result<()> {
        let server = create_test_server_with_store(&MemoryStore::new())?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let body = response.json::<HealthResponse>();
        assert!(body.healthy);
        Ok(())
    }

    #[tokio::test]
    async fn test_unhealthy_store_is_unavailable() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.fail_health_checks(Some("repository unreachable".to_string()));
        let server = create_test_server_with_store(&store)?;

        let response = server.get("/health").await;
        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["healthy"], serde_json::json!(false));
        assert!(body["checkedAt"].is_string());
        Ok(())
    }
}
