//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # Body limits
//! └── service: ServiceConfig        # GitHub repository, index policies
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! scorebook --github-owner my-org --github-repo survey-archive --port 8080
//!
//! # Or via environment variables
//! GITHUB_USER=my-org GITHUB_REPO=survey-archive PORT=8080 scorebook
//! ```

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use middleware::MiddlewareConfig;
use scorebook_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the scorebook server:
/// - [`ServerConfig`]: Network binding and shutdown
/// - [`MiddlewareConfig`]: Request body limits
/// - [`ServiceConfig`]: Target repository and index handling
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "scorebook")]
#[command(about = "Survey-score upload server backed by a GitHub repository")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (body limits).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Repository and index configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so clap can pick its values up as
    /// environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;

        anyhow::ensure!(
            self.service.index_write_attempts > 0,
            "index write attempts must be at least 1"
        );

        Ok(())
    }

    /// Logs configuration (no credentials).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            owner = %self.service.github.owner,
            repo = %self.service.github.repo,
            branch = %self.service.github.effective_branch(),
            index_read_policy = %self.service.index_read_policy,
            index_write_attempts = self.service.index_write_attempts,
            "Repository configuration"
        );
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use scorebook_server::service::IndexReadPolicy;

    use super::*;

    const REQUIRED: [&str; 7] = [
        "scorebook",
        "--github-token",
        "ghp_test",
        "--github-owner",
        "octo",
        "--github-repo",
        "scores",
    ];

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(REQUIRED).unwrap();

        assert_eq!(cli.middleware.security.max_body_size, 10 * 1024 * 1024);
        assert_eq!(cli.service.github.owner, "octo");
        assert_eq!(cli.service.github.effective_branch(), "main");
        assert_eq!(cli.service.index_read_policy, IndexReadPolicy::Lenient);
        assert_eq!(cli.service.index_write_attempts, 1);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parse_overrides() {
        let args = REQUIRED.into_iter().chain([
            "--port",
            "8080",
            "--github-branch",
            "data",
            "--index-read-policy",
            "strict",
            "--index-write-attempts",
            "3",
        ]);
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.service.github.branch, "data");
        assert_eq!(cli.service.index_read_policy, IndexReadPolicy::Strict);
        assert_eq!(cli.service.index_write_attempts, 3);
    }

    #[test]
    fn reject_zero_write_attempts() {
        let args = REQUIRED
            .into_iter()
            .chain(["--index-write-attempts", "0"]);
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.validate().is_err());
    }
}
