use scorebook_github::PutContentRequest;
use serde_json::Value;

use super::TRACING_TARGET;
use crate::Result;

/// Repository path of the survey-score index.
pub const INDEX_PATH: &str = "data/survey-scores.json";

/// Content assumed for an index that could not be read.
pub const INDEX_PLACEHOLDER: &str = "[]";

/// Commit message of the first index write.
pub const CREATE_INDEX_MESSAGE: &str = "Create survey scores metadata";

/// Commit message of later index writes.
pub const UPDATE_INDEX_MESSAGE: &str = "Update survey scores metadata";

/// Index content as read from the store, with its concurrency token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSnapshot {
    content: String,
    sha: Option<String>,
}

impl IndexSnapshot {
    /// Snapshot of an index that does not exist or could not be read.
    pub fn missing() -> Self {
        Self {
            content: INDEX_PLACEHOLDER.to_owned(),
            sha: None,
        }
    }

    /// Snapshot of fetched index content.
    pub fn fetched(content: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sha: Some(sha.into()),
        }
    }

    /// Returns `true` when the content differs from the placeholder.
    ///
    /// Only then does the next write replace an existing object.
    pub fn exists(&self) -> bool {
        self.content != INDEX_PLACEHOLDER
    }

    /// Returns the concurrency token of the fetched index.
    pub fn sha(&self) -> Option<&str> {
        self.sha.as_deref()
    }

    /// Parses the index into its records.
    ///
    /// Content that is not a JSON array yields no records.
    pub fn entries(&self) -> Vec<Value> {
        match serde_json::from_str::<Value>(&self.content) {
            Ok(Value::Array(entries)) => entries,
            Ok(other) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    found = json_type(&other),
                    "Index is not a JSON array, starting from an empty index"
                );
                Vec::new()
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Index is not valid JSON, starting from an empty index"
                );
                Vec::new()
            }
        }
    }

    /// Builds the write that replaces this snapshot with `content`.
    pub fn write_request(self, content: String) -> PutContentRequest {
        if self.exists() {
            PutContentRequest::from_bytes(INDEX_PATH, UPDATE_INDEX_MESSAGE, content)
                .with_optional_sha(self.sha)
        } else {
            PutContentRequest::from_bytes(INDEX_PATH, CREATE_INDEX_MESSAGE, content)
        }
    }
}

/// Serializes index records with two-space indentation.
pub fn render_index(entries: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
