//! Middleware configuration for the HTTP server.
//!
//! Request limits are defined in `scorebook-server` and support CLI arguments
//! as well as environment variables.
//!
//! ```bash
//! scorebook --max-body-size 20971520
//! ```

use clap::Args;
use scorebook_server::middleware::SecurityConfig;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration for request limits.
#[derive(Debug, Clone, Default, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request limits.
    #[clap(flatten)]
    pub security: SecurityConfig,
}

impl MiddlewareConfig {
    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_body_size = self.security.max_body_size,
            "Middleware configuration"
        );
    }
}
