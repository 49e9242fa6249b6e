//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! ```rust,ignore
//! use scorebook_server::handler::routes;
//! use scorebook_server::service::{ServiceConfig, ServiceState};
//!
//! let state = ServiceState::from_config(&config)?;
//! let app = routes().with_state(state);
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
pub mod request;
pub mod response;
mod survey_scores;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::survey_scores::UPLOAD_SURVEY_SCORES_PATH;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(survey_scores::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use scorebook_github::ContentStoreService;
    use scorebook_github::memory::MemoryStore;
    use scorebook_github::reqwest::GithubConfig;

    use crate::handler::routes;
    use crate::middleware::RouterRecoveryExt;
    use crate::service::{ServiceConfig, ServiceState};

    /// Returns the configuration used by handler tests.
    pub fn test_config() -> ServiceConfig {
        ServiceConfig::new(GithubConfig::new("ghp_test", "octo", "scores"))
    }

    /// Returns a new [`TestServer`] backed by any content store.
    pub fn create_test_server_with_service(
        content_store: ContentStoreService,
        config: &ServiceConfig,
    ) -> anyhow::Result<TestServer> {
        let state = ServiceState::with_store(config, content_store);
        let app = routes().with_state(state).with_recovery();
        let server = TestServer::new(app)?;
        Ok(server)
    }

    /// Returns a new [`TestServer`] backed by the given store and configuration.
    pub fn create_test_server_with_config(
        store: &MemoryStore,
        config: &ServiceConfig,
    ) -> anyhow::Result<TestServer> {
        create_test_server_with_service(ContentStoreService::new(store.clone()), config)
    }

    /// Returns a new [`TestServer`] backed by the given store.
    pub fn create_test_server_with_store(store: &MemoryStore) -> anyhow::Result<TestServer> {
        create_test_server_with_config(store, &test_config())
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server_with_store(&MemoryStore::new())?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let server = create_test_server_with_store(&store)?;

        let response = server.get("/api/unknown").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&serde_json::json!({ "error": "Not found" }));
        assert_eq!(store.operation_count(), 0);
        Ok(())
    }
}
