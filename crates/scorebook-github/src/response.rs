//! Content store response types.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An object read from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFile {
    /// Repository-relative object path.
    pub path: String,
    /// Content hash, used as the concurrency token on update.
    pub sha: String,
    /// Base64-encoded content, possibly wrapped across lines.
    #[serde(default)]
    pub content: String,
    /// Encoding of `content`, `base64` for regular files.
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentFile {
    /// Decodes the content into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        if let Some(encoding) = self.encoding.as_deref()
            && encoding != "base64"
        {
            return Err(Error::serialization()
                .with_message(format!("Unsupported content encoding: {encoding}")));
        }

        let compact: String = self
            .content
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        Ok(STANDARD.decode(compact)?)
    }

    /// Decodes the content into a UTF-8 string.
    pub fn decode_utf8(&self) -> Result<String> {
        Ok(String::from_utf8(self.decode()?)?)
    }
}

/// Result of a successful write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutContentResponse {
    /// The object as stored after the write.
    pub content: ContentRef,
    /// The commit that recorded the write.
    pub commit: CommitRef,
}

/// Reference to a stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRef {
    /// Repository-relative object path.
    pub path: String,
    /// New content hash.
    pub sha: String,
    /// Public download address, when the store exposes one.
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Reference to a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    /// Commit hash.
    pub sha: String,
}
