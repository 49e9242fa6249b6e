//! Content store request types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Creates or replaces the content of an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutContentRequest {
    /// Repository-relative object path.
    pub path: String,
    /// Commit message recorded with the write.
    pub message: String,
    /// Base64-encoded object content.
    pub content: String,
    /// Branch the write is committed to (store default when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Content hash of the object being replaced.
    ///
    /// Required when the object already exists, absent on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl PutContentRequest {
    /// Creates a write request from content that is already base64-encoded.
    pub fn new(
        path: impl Into<String>,
        message: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            content: content.into(),
            branch: None,
            sha: None,
        }
    }

    /// Creates a write request from raw bytes, encoding them as base64.
    pub fn from_bytes(
        path: impl Into<String>,
        message: impl Into<String>,
        bytes: impl AsRef<[u8]>,
    ) -> Self {
        Self::new(path, message, STANDARD.encode(bytes))
    }

    /// Sets the target branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets the concurrency token of the object being replaced.
    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    /// Sets the concurrency token when one is present.
    pub fn with_optional_sha(mut self, sha: Option<String>) -> Self {
        self.sha = sha;
        self
    }
}

/// Fetches the content of an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetContentRequest {
    /// Repository-relative object path.
    pub path: String,
    /// Branch, tag or commit to read from (store default when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl GetContentRequest {
    /// Creates a read request for the given path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reference: None,
        }
    }

    /// Sets the ref to read from.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}
