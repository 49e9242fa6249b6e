//! Response types for HTTP handlers.

mod error_response;
mod monitors;
mod survey_scores;

pub use error_response::{ErrorFormat, ErrorResponse};
pub use monitors::HealthResponse;
pub use survey_scores::UploadSurveyScoreResponse;
