use serde::{Deserialize, Serialize};

use crate::service::SurveyScoreEntry;

/// Response body of a successful upload.
///
/// `entry` is identical to the record appended to the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadSurveyScoreResponse {
    /// Always `true`.
    pub success: bool,
    /// The index record created for the upload.
    pub entry: SurveyScoreEntry,
}

impl From<SurveyScoreEntry> for UploadSurveyScoreResponse {
    fn from(entry: SurveyScoreEntry) -> Self {
        Self {
            success: true,
            entry,
        }
    }
}
