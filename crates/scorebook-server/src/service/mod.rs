//! Application state and dependency injection.

mod config;
mod survey;

use scorebook_github::ContentStoreService;
use scorebook_github::reqwest::GithubClient;

pub use crate::service::config::{DEFAULT_INDEX_WRITE_ATTEMPTS, IndexReadPolicy, ServiceConfig};
pub use crate::service::survey::{
    CREATE_INDEX_MESSAGE, DEFAULT_EXTENSION, INDEX_PATH, INDEX_PLACEHOLDER, IndexSnapshot,
    OBJECT_DIRECTORY, Semester, SurveyScoreEntry, SurveyScoreService, SurveyScoreUpload,
    UPDATE_INDEX_MESSAGE, UploadClock, UploadStamp, file_extension, file_payload, object_path,
    render_index, semester_text,
};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub content_store: ContentStoreService,

    // Internal services:
    pub survey_scores: SurveyScoreService,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Creates the GitHub client; no request is sent until the first upload.
    pub fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let client = GithubClient::new(service_config.github.clone())?;
        Ok(Self::with_store(service_config, client.into_service()))
    }

    /// Initializes application state around an existing content store.
    pub fn with_store(service_config: &ServiceConfig, content_store: ContentStoreService) -> Self {
        Self {
            survey_scores: SurveyScoreService::new(content_store.clone(), service_config),
            content_store,
        }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(content_store: ContentStoreService);

// Internal services:
impl_di!(survey_scores: SurveyScoreService);

#[cfg(test)]
mod tests {
    use scorebook_github::reqwest::GithubConfig;

    use super::*;

    #[test]
    fn test_from_config_rejects_incomplete_repository() {
        let config = ServiceConfig::new(GithubConfig::new("t", "", "r"));
        let error = ServiceState::from_config(&config).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Config);
    }

    #[test]
    fn test_from_config() {
        let config = ServiceConfig::new(GithubConfig::new("t", "o", "r"));
        assert!(ServiceState::from_config(&config).is_ok());
    }
}
