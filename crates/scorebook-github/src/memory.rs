//! In-memory content store for testing.
//!
//! [`MemoryStore`] keeps objects in a map and enforces the same optimistic
//! concurrency rules as the GitHub contents API: replacing an existing object
//! requires its current `sha`, and creating an object must not carry one.
//! Failures can be injected per operation to exercise error paths.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! scorebook-github = { version = "...", features = ["test-utils"] }
//! ```
//!
//! Branches are not modelled; every ref reads and writes the same objects.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use crate::{
    CommitRef, ContentFile, ContentRef, ContentStore, Error, ErrorKind, GetContentRequest,
    PutContentRequest, PutContentResponse, Result, ServiceHealth,
};

/// Kind of operation recorded by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// A `put_content` call.
    Put,
    /// A `get_content` call.
    Get,
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<String, Vec<u8>>,
    put_failures: HashMap<String, VecDeque<ErrorKind>>,
    get_failure: Option<ErrorKind>,
    unhealthy: Option<String>,
    operations: Vec<(Operation, String)>,
    commits: u64,
}

/// Thread-safe, cloneable in-memory [`ContentStore`].
///
/// Clones share the same objects, so a test can keep a handle while the
/// server under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Computes the content hash used as the concurrency token.
    pub fn content_sha(bytes: &[u8]) -> String {
        hex::encode(Sha256::digest(bytes))
    }

    /// Stores an object directly, bypassing concurrency checks.
    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.lock().objects.insert(path.into(), bytes.into());
    }

    /// Returns the raw content of an object.
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().objects.get(path).cloned()
    }

    /// Returns the content of an object as UTF-8 text.
    pub fn read_utf8(&self, path: &str) -> Option<String> {
        self.read(path)
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Returns the current concurrency token of an object.
    pub fn sha(&self, path: &str) -> Option<String> {
        self.read(path).map(|bytes| Self::content_sha(&bytes))
    }

    /// Returns all stored paths in lexical order.
    pub fn paths(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Returns every operation performed so far, with its path.
    pub fn operations(&self) -> Vec<(Operation, String)> {
        self.lock().operations.clone()
    }

    /// Returns the number of operations performed so far.
    pub fn operation_count(&self) -> usize {
        self.lock().operations.len()
    }

    /// Fails the next write to `path` with the given kind.
    ///
    /// Calls queue up: each injected failure is consumed by one write.
    pub fn fail_next_put(&self, path: impl Into<String>, kind: ErrorKind) {
        self.lock()
            .put_failures
            .entry(path.into())
            .or_default()
            .push_back(kind);
    }

    /// Fails every read with the given kind until cleared.
    pub fn fail_gets(&self, kind: Option<ErrorKind>) {
        self.lock().get_failure = kind;
    }

    /// Reports the store as unhealthy with the given message until cleared.
    pub fn fail_health_checks(&self, message: Option<String>) {
        self.lock().unhealthy = message;
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn put_content(&self, request: &PutContentRequest) -> Result<PutContentResponse> {
        let mut state = self.lock();
        state
            .operations
            .push((Operation::Put, request.path.clone()));

        if let Some(kind) = state
            .put_failures
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
        {
            return Err(Error::new(kind).with_message("Injected write failure"));
        }

        let bytes = STANDARD.decode(request.content.as_bytes()).map_err(|e| {
            Error::from_source(ErrorKind::InvalidInput, e).with_message("content is not valid Base64")
        })?;

        let current = state.objects.get(&request.path).map(|b| Self::content_sha(b));
        match (current.as_deref(), request.sha.as_deref()) {
            (Some(_), None) => {
                return Err(Error::conflict().with_message("\"sha\" wasn't supplied."));
            }
            (Some(current), Some(sha)) if current != sha => {
                return Err(Error::conflict().with_message(format!(
                    "{} does not match {sha}",
                    request.path
                )));
            }
            (None, Some(_)) => {
                return Err(Error::conflict().with_message(format!(
                    "{} does not exist",
                    request.path
                )));
            }
            _ => {}
        }

        let sha = Self::content_sha(&bytes);
        state.objects.insert(request.path.clone(), bytes);
        state.commits += 1;
        let commit = Self::content_sha(state.commits.to_string().as_bytes());

        Ok(PutContentResponse {
            content: ContentRef {
                path: request.path.clone(),
                sha,
                download_url: None,
            },
            commit: CommitRef { sha: commit },
        })
    }

    async fn get_content(&self, request: &GetContentRequest) -> Result<ContentFile> {
        let mut state = self.lock();
        state
            .operations
            .push((Operation::Get, request.path.clone()));

        if let Some(kind) = state.get_failure {
            return Err(Error::new(kind).with_message("Injected read failure"));
        }

        let bytes = state
            .objects
            .get(&request.path)
            .ok_or_else(|| Error::not_found().with_message("Not Found"))?;

        Ok(ContentFile {
            path: request.path.clone(),
            sha: Self::content_sha(bytes),
            content: STANDARD.encode(bytes),
            encoding: Some("base64".to_string()),
        })
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        let health = match self.lock().unhealthy.clone() {
            Some(message) => ServiceHealth::unhealthy(message),
            None => ServiceHealth::healthy(),
        };
        Ok(health)
    }
}
