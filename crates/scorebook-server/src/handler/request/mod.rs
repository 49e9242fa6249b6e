//! Request types for HTTP handlers.

mod survey_scores;

pub use survey_scores::UploadSurveyScore;
