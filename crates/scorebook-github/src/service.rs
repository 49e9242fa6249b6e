//! Content store service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    ContentFile, ContentStore, GetContentRequest, PutContentRequest, PutContentResponse, Result,
    ServiceHealth, TRACING_TARGET,
};

/// Content store service wrapper with observability.
///
/// This wrapper adds structured logging to any [`ContentStore`] implementation.
/// The inner store is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct ContentStoreService {
    inner: Arc<dyn ContentStore>,
}

impl fmt::Debug for ContentStoreService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStoreService").finish_non_exhaustive()
    }
}

impl ContentStoreService {
    /// Create a new content store service wrapper.
    pub fn new<S>(store: S) -> Self
    where
        S: ContentStore + 'static,
    {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Creates or replaces the content of an object.
    pub async fn put_content(&self, request: &PutContentRequest) -> Result<PutContentResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %request.path,
            branch = ?request.branch,
            has_sha = request.sha.is_some(),
            content_len = request.content.len(),
            "Writing object"
        );

        let result = self.inner.put_content(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %response.content.path,
                    sha = %response.content.sha,
                    commit = %response.commit.sha,
                    elapsed_ms = elapsed.as_millis(),
                    "Object written"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %request.path,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Object write failed"
                );
            }
        }

        result
    }

    /// Fetches the content of an object.
    pub async fn get_content(&self, request: &GetContentRequest) -> Result<ContentFile> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            path = %request.path,
            reference = ?request.reference,
            "Reading object"
        );

        let result = self.inner.get_content(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(file) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %file.path,
                    sha = %file.sha,
                    elapsed_ms = elapsed.as_millis(),
                    "Object read"
                );
            }
            Err(error) if error.is_not_found() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    path = %request.path,
                    elapsed_ms = elapsed.as_millis(),
                    "Object not found"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    path = %request.path,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Object read failed"
                );
            }
        }

        result
    }

    /// Performs a health check on the underlying store.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        let started_at = Instant::now();
        let health = self.inner.health_check().await?;
        Ok(health.with_response_time(started_at.elapsed()))
    }
}
