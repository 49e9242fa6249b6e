use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Health status of the server and its content store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Whether the content store answered the health check.
    pub healthy: bool,
    /// Round trip of the health check in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Timestamp when the health check was performed.
    pub checked_at: Timestamp,
}
