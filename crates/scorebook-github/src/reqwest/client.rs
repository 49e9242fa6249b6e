//! Reqwest-based HTTP client for the GitHub contents API.

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::{Error, GithubConfig, Result, TRACING_TARGET};
use crate::{
    ContentFile, ContentStore, ContentStoreService, GetContentRequest, PutContentRequest,
    PutContentResponse, ServiceHealth,
};

/// Media type requested from the REST API.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned by this client.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Inner client that holds the HTTP client and configuration.
struct GithubClientInner {
    http: Client,
    config: GithubConfig,
}

/// Body of a create-or-update contents call.
#[derive(Debug, Serialize)]
struct PutContentBody<'a> {
    message: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Error body returned by the REST API.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Reqwest-based client for reading and writing repository contents.
///
/// This client implements the [`ContentStore`] trait on top of the GitHub
/// REST contents API. Reads and writes that do not name a branch use the
/// configured one.
///
/// # Examples
///
/// ```rust,ignore
/// use scorebook_github::reqwest::{GithubClient, GithubConfig};
/// use scorebook_github::{ContentStore, GetContentRequest};
///
/// let config = GithubConfig::new(token, "owner", "repo");
/// let client = GithubClient::new(config)?;
///
/// let file = client.get_content(&GetContentRequest::new("data/survey-scores.json")).await?;
/// ```
#[derive(Clone)]
pub struct GithubClient {
    inner: Arc<GithubClientInner>,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: GithubConfig) -> Result<Self> {
        config.validate()?;

        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = timeout.as_millis(),
            owner = %config.owner,
            repo = %config.repo,
            branch = %config.effective_branch(),
            "Creating GitHub client"
        );

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| Error::Config("GitHub token contains invalid characters".into()))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .default_headers(headers)
            .build()?;

        let inner = GithubClientInner { http, config };
        let client = Self {
            inner: Arc::new(inner),
        };

        tracing::info!(
            target: TRACING_TARGET,
            "GitHub client created successfully"
        );

        Ok(client)
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &GithubConfig {
        &self.inner.config
    }

    /// Converts this client into a [`ContentStoreService`] for use with dependency injection.
    pub fn into_service(self) -> ContentStoreService {
        ContentStoreService::new(self)
    }

    /// Sends a request and turns non-success statuses into [`Error::Status`].
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate_limited = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0");

        let body: ApiErrorBody = response.json().await.unwrap_or_default();
        let message = body.message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unexpected response")
                .to_string()
        });

        Err(Error::Status {
            status: status.as_u16(),
            message,
            rate_limited,
        })
    }

    async fn put(&self, request: &PutContentRequest) -> Result<PutContentResponse> {
        let url = self.config().contents_url(&request.path)?;
        let branch = request
            .branch
            .as_deref()
            .unwrap_or_else(|| self.config().effective_branch());

        let body = PutContentBody {
            message: &request.message,
            content: &request.content,
            branch: Some(branch),
            sha: request.sha.as_deref(),
        };

        let response = self.send(self.http().put(url).json(&body)).await?;
        Ok(response.json().await?)
    }

    async fn get(&self, request: &GetContentRequest) -> Result<ContentFile> {
        let url = self.config().contents_url(&request.path)?;
        let reference = request
            .reference
            .as_deref()
            .unwrap_or_else(|| self.config().effective_branch());

        let response = self
            .send(self.http().get(url).query(&[("ref", reference)]))
            .await?;
        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl ContentStore for GithubClient {
    async fn put_content(&self, request: &PutContentRequest) -> crate::Result<PutContentResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %request.path,
            has_sha = request.sha.is_some(),
            "Sending create-or-update contents request"
        );

        Ok(self.put(request).await?)
    }

    async fn get_content(&self, request: &GetContentRequest) -> crate::Result<ContentFile> {
        tracing::debug!(
            target: TRACING_TARGET,
            path = %request.path,
            "Sending get contents request"
        );

        Ok(self.get(request).await?)
    }

    async fn health_check(&self) -> crate::Result<ServiceHealth> {
        let started_at = Instant::now();
        let url = self.config().repository_url()?;

        let health = match self.send(self.http().get(url)).await {
            Ok(_) => ServiceHealth::healthy(),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "GitHub repository is not reachable"
                );
                ServiceHealth::unhealthy(error.to_string())
            }
        };

        Ok(health.with_response_time(started_at.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = GithubConfig::new("ghp_test", "octo", "scores");
        let client = GithubClient::new(config).unwrap();
        assert_eq!(client.config().owner, "octo");
        assert!(!format!("{client:?}").contains("ghp_test"));
    }

    #[test]
    fn test_client_rejects_incomplete_config() {
        let config = GithubConfig::new("ghp_test", "", "scores");
        assert!(GithubClient::new(config).is_err());
    }

    #[test]
    fn test_put_body_serialization() {
        let body = PutContentBody {
            message: "Create survey scores metadata",
            content: "W10=",
            branch: Some("main"),
            sha: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["branch"], "main");
        assert!(json.get("sha").is_none());
    }
}
