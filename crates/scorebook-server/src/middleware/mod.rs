//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Recovery: handler panics become error responses
//! - Observability: request ids and request tracing
//! - Security: request body limits
//!
//! ```rust,ignore
//! use scorebook_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityConfig,
//! };
//!
//! let app = router
//!     .with_security(&SecurityConfig::default())
//!     .with_observability()
//!     .with_recovery();
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::RouterRecoveryExt;
pub use security::{DEFAULT_MAX_BODY_SIZE, RouterSecurityExt, SecurityConfig};
