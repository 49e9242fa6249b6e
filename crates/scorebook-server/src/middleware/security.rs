//! Request body size limiting.

use axum::Router;
use axum::extract::DefaultBodyLimit;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default maximum request body size: 10 MiB.
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Configuration for request limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityConfig {
    /// Maximum accepted request body size in bytes
    #[cfg_attr(
        feature = "config",
        arg(long, env = "MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)
    )]
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Extension trait for `axum::`[`Router`] to apply request limits.
pub trait RouterSecurityExt<S> {
    /// Limits request bodies read by extractors to `max_body_size` bytes.
    ///
    /// Larger bodies are rejected with `413 Payload Too Large`.
    fn with_security(self, config: &SecurityConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, config: &SecurityConfig) -> Self {
        self.layer(DefaultBodyLimit::max(config.max_body_size))
    }
}
