#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod health;
mod service;

pub mod request;
pub mod response;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod memory;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use request::{GetContentRequest, PutContentRequest};
pub use response::{CommitRef, ContentFile, ContentRef, PutContentResponse};
pub use service::ContentStoreService;

/// Tracing target for content store operations.
pub const TRACING_TARGET: &str = "scorebook_github::store";

/// Core trait for a remote, versioned content store.
///
/// Objects are addressed by path and carry a content hash (`sha`) that
/// must be echoed back when an existing object is updated.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Creates or replaces the content of the object at the request path.
    async fn put_content(&self, request: &PutContentRequest) -> Result<PutContentResponse>;

    /// Fetches the content and hash of the object at the request path.
    ///
    /// Missing objects fail with [`ErrorKind::NotFound`].
    async fn get_content(&self, request: &GetContentRequest) -> Result<ContentFile>;

    /// Performs a health check on the content store.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
