//! GitHub client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Error, Result};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default branch objects are committed to.
pub const DEFAULT_BRANCH: &str = "main";

/// Default REST API base address.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default host serving raw file content.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// Repository coordinates and credentials for the GitHub contents API.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct GithubConfig {
    /// Personal access token used to authenticate API calls
    #[cfg_attr(
        feature = "config",
        arg(long = "github-token", env = "GITHUB_TOKEN", hide_env_values = true)
    )]
    pub token: String,

    /// Owner (user or organization) of the repository
    #[cfg_attr(feature = "config", arg(long = "github-owner", env = "GITHUB_USER"))]
    pub owner: String,

    /// Name of the repository
    #[cfg_attr(feature = "config", arg(long = "github-repo", env = "GITHUB_REPO"))]
    pub repo: String,

    /// Branch objects are read from and committed to
    #[cfg_attr(
        feature = "config",
        arg(long = "github-branch", env = "GITHUB_BRANCH", default_value = DEFAULT_BRANCH)
    )]
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Base address of the GitHub REST API
    #[cfg_attr(
        feature = "config",
        arg(long = "github-api-url", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Host serving raw file content, used to build public object addresses
    #[cfg_attr(
        feature = "config",
        arg(long = "github-raw-url", env = "GITHUB_RAW_URL", default_value = DEFAULT_RAW_URL)
    )]
    #[serde(default = "default_raw_url")]
    pub raw_url: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_raw_url() -> String {
    DEFAULT_RAW_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .field("raw_url", &self.raw_url)
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl GithubConfig {
    /// Creates a configuration for the given repository on the default branch.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: default_branch(),
            api_url: default_api_url(),
            raw_url: default_raw_url(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }

    /// Set the branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the REST API base address.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the raw content host.
    #[must_use]
    pub fn with_raw_url(mut self, raw_url: impl Into<String>) -> Self {
        self.raw_url = raw_url.into();
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Returns the branch, falling back to `main` when blank.
    pub fn effective_branch(&self) -> &str {
        let branch = self.branch.trim();
        if branch.is_empty() {
            DEFAULT_BRANCH
        } else {
            branch
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("scorebook/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Checks that the repository coordinates are present.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("token", &self.token),
            ("owner", &self.owner),
            ("repo", &self.repo),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("GitHub {name} must not be empty")));
            }
        }

        Url::parse(&self.api_url)?;
        Url::parse(&self.raw_url)?;
        Ok(())
    }

    /// Returns the API address of the repository.
    pub fn repository_url(&self) -> Result<Url> {
        self.api_endpoint(&[])
    }

    /// Returns the contents API address of an object.
    pub fn contents_url(&self, path: &str) -> Result<Url> {
        let segments: Vec<&str> = std::iter::once("contents")
            .chain(path.split('/').filter(|s| !s.is_empty()))
            .collect();
        self.api_endpoint(&segments)
    }

    fn api_endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_url)?;
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("{} cannot be a base URL", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Returns the public address serving the raw content of an object.
    pub fn raw_content_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.effective_branch(),
            path.trim_start_matches('/'),
        )
    }
}
