//! Reqwest-based client for the GitHub contents API.
//!
//! This module provides a reqwest-based implementation of the [`ContentStore`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use scorebook_github::reqwest::{GithubClient, GithubConfig};
//! use scorebook_github::ContentStoreService;
//!
//! let config = GithubConfig::new(token, "owner", "repo");
//! let client = GithubClient::new(config)?;
//!
//! // Convert to a service for dependency injection
//! let service: ContentStoreService = client.into_service();
//! ```
//!
//! [`ContentStore`]: crate::ContentStore

mod client;
mod config;
mod error;

pub use client::GithubClient;
pub use config::GithubConfig;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "scorebook_github::reqwest";
