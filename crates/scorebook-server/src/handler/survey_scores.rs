//! Survey-score upload handler.

use axum::Router;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tracing::Instrument;

use super::request::UploadSurveyScore;
use super::response::UploadSurveyScoreResponse;
use crate::extract::{Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{ServiceState, SurveyScoreService};

/// Tracing target for survey-score operations.
const TRACING_TARGET: &str = "scorebook_server::handler::survey_scores";

/// Route of the upload endpoint.
pub const UPLOAD_SURVEY_SCORES_PATH: &str = "/api/upload-survey-scores";

/// Stores an uploaded survey-score file and records it in the index.
#[tracing::instrument(
    skip_all,
    fields(
        file_name = request.file_name_text(),
        semester = request.semester_code(),
    )
)]
async fn upload_survey_scores(
    State(survey_scores): State<SurveyScoreService>,
    ValidateJson(request): ValidateJson<UploadSurveyScore>,
) -> Result<Json<UploadSurveyScoreResponse>> {
    tracing::debug!(target: TRACING_TARGET, "Uploading survey scores");

    let upload = request.into_upload()?;

    // Detached: the file and index writes complete even if the request is dropped.
    let entry = tokio::spawn(async move { survey_scores.upload(upload).await }.in_current_span())
        .await
        .map_err(|error| {
            crate::Error::internal(format!("upload task failed: {error}")).with_source(error)
        })??;

    tracing::info!(
        target: TRACING_TARGET,
        id = %entry.id,
        url = %entry.url,
        "Survey scores uploaded"
    );

    Ok(Json(entry.into()))
}

/// Rejects every method other than `POST` on the upload route.
async fn method_not_allowed() -> Response {
    ErrorKind::MethodNotAllowed.into_response()
}

/// Returns a [`Router`] with the upload route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route(
        UPLOAD_SURVEY_SCORES_PATH,
        post(upload_survey_scores).fallback(method_not_allowed),
    )
}
