//! Survey-score uploads: file storage and the metadata index.
//!
//! An upload first stores the file under `data/survey-scores/` and then
//! appends a [`SurveyScoreEntry`] to the JSON array at [`INDEX_PATH`] with a
//! read-modify-write of that object. The stored file is never removed when
//! the index update fails.

mod clock;
mod entry;
mod index;
mod object;
mod semester;

use std::sync::Arc;

use scorebook_github::reqwest::GithubConfig;
use scorebook_github::{ContentStoreService, GetContentRequest, PutContentRequest};
use serde_json::Value;

pub use self::clock::{UploadClock, UploadStamp};
pub use self::entry::SurveyScoreEntry;
pub use self::index::{
    CREATE_INDEX_MESSAGE, INDEX_PATH, INDEX_PLACEHOLDER, IndexSnapshot, UPDATE_INDEX_MESSAGE,
    render_index,
};
pub use self::object::{
    DEFAULT_EXTENSION, OBJECT_DIRECTORY, file_extension, file_payload, object_path,
};
pub use self::semester::{Semester, semester_text};
use crate::Result;
use crate::service::{IndexReadPolicy, ServiceConfig};

/// Tracing target for survey-score uploads.
pub(crate) const TRACING_TARGET: &str = "scorebook_server::service::survey_scores";

/// Validated upload input.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyScoreUpload {
    /// Academic year, string or number.
    pub year: Value,
    /// Semester code.
    pub semester: String,
    /// File content as `<meta>,<base64>`.
    pub file: String,
    /// Original file name.
    pub file_name: String,
}

/// Stores survey-score files and maintains their index.
#[derive(Debug, Clone)]
pub struct SurveyScoreService {
    store: ContentStoreService,
    github: Arc<GithubConfig>,
    read_policy: IndexReadPolicy,
    write_attempts: u32,
    clock: UploadClock,
}

impl SurveyScoreService {
    /// Creates a service writing through `store` into the configured repository.
    pub fn new(store: ContentStoreService, config: &ServiceConfig) -> Self {
        Self {
            store,
            github: Arc::new(config.github.clone()),
            read_policy: config.index_read_policy,
            write_attempts: config.index_write_attempts.max(1),
            clock: UploadClock::new(),
        }
    }

    /// Stores the uploaded file and appends its record to the index.
    ///
    /// Returns the appended record.
    pub async fn upload(&self, upload: SurveyScoreUpload) -> Result<SurveyScoreEntry> {
        let stamp = self.clock.stamp();
        let path = object_path(stamp.id, &upload.file_name);
        let payload = file_payload(&upload.file)?;

        let request = PutContentRequest::new(
            &path,
            format!("Upload survey scores: {}", upload.file_name),
            payload,
        )
        .with_branch(self.github.effective_branch());
        self.store.put_content(&request).await?;

        tracing::info!(
            target: TRACING_TARGET,
            id = stamp.id,
            path = %path,
            "Survey score file stored"
        );

        let entry = SurveyScoreEntry {
            id: stamp.id.to_string(),
            year: upload.year,
            semester_text: semester_text(&upload.semester),
            semester: upload.semester,
            file_name: upload.file_name,
            url: self.github.raw_content_url(&path),
            uploaded_at: format!("{:.3}", stamp.at),
        };

        self.append_to_index(&entry).await?;
        Ok(entry)
    }

    /// Appends a record to the index, re-reading it after lost conflicts.
    async fn append_to_index(&self, entry: &SurveyScoreEntry) -> Result<()> {
        let record = serde_json::to_value(entry)?;
        let mut attempt = 1;

        loop {
            let snapshot = self.read_index().await?;
            let mut entries = snapshot.entries();
            entries.push(record.clone());

            let content = render_index(&entries)?;
            let request = snapshot
                .write_request(content)
                .with_branch(self.github.effective_branch());

            match self.store.put_content(&request).await {
                Ok(_) => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        id = %entry.id,
                        entries = entries.len(),
                        attempt,
                        "Survey score index updated"
                    );
                    return Ok(());
                }
                Err(error) if error.is_conflict() && attempt < self.write_attempts => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        id = %entry.id,
                        attempt,
                        error = %error,
                        "Index changed concurrently, retrying"
                    );
                    attempt += 1;
                }
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Reads the index, applying the read policy to failures.
    async fn read_index(&self) -> Result<IndexSnapshot> {
        let request =
            GetContentRequest::new(INDEX_PATH).with_reference(self.github.effective_branch());

        let fetched = self
            .store
            .get_content(&request)
            .await
            .and_then(|file| Ok((file.decode()?, file.sha)));

        match fetched {
            Ok((bytes, sha)) => Ok(IndexSnapshot::fetched(
                String::from_utf8_lossy(&bytes),
                sha,
            )),
            Err(error) if error.is_not_found() => Ok(IndexSnapshot::missing()),
            Err(error) => match self.read_policy {
                IndexReadPolicy::Lenient => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        error = %error,
                        "Index read failed, starting from an empty index"
                    );
                    Ok(IndexSnapshot::missing())
                }
                IndexReadPolicy::Strict => Err(error.into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use scorebook_github::ErrorKind as StoreErrorKind;
    use scorebook_github::memory::{MemoryStore, Operation};
    use serde_json::json;

    use super::*;

    fn config() -> ServiceConfig {
        ServiceConfig::new(GithubConfig::new("ghp_test", "octo", "scores"))
    }

    fn service(store: &MemoryStore, config: &ServiceConfig) -> SurveyScoreService {
        SurveyScoreService::new(ContentStoreService::new(store.clone()), config)
    }

    fn upload(file_name: &str) -> SurveyScoreUpload {
        SurveyScoreUpload {
            year: json!("2024"),
            semester: "final2".into(),
            file: "data:application/pdf;base64,JVBERi0xLjQ=".into(),
            file_name: file_name.into(),
        }
    }

    fn index(store: &MemoryStore) -> Vec<Value> {
        let content = store.read_utf8(INDEX_PATH).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn test_first_upload_creates_index() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let entry = service(&store, &config()).upload(upload("scores.pdf")).await?;

        let path = format!("data/survey-scores/{}.pdf", entry.id);
        assert_eq!(store.read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(entry.semester_text, "Cuối HK2");
        assert_eq!(
            entry.url,
            format!("https://raw.githubusercontent.com/octo/scores/main/{path}")
        );
        assert_eq!(index(&store), vec![serde_json::to_value(&entry)?]);
        assert_eq!(
            store.operations(),
            vec![
                (Operation::Put, path),
                (Operation::Get, INDEX_PATH.to_string()),
                (Operation::Put, INDEX_PATH.to_string()),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_appends_and_preserves_existing_records() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.insert(INDEX_PATH, r#"[{"legacy":true,"id":"1"}]"#);

        let entry = service(&store, &config()).upload(upload("scores.pdf")).await?;

        let records = index(&store);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], json!({"legacy": true, "id": "1"}));
        assert_eq!(records[1]["id"], json!(entry.id));
        assert!(store.read_utf8(INDEX_PATH).unwrap().starts_with("[\n  {\n    \"legacy\""));
        Ok(())
    }

    #[tokio::test]
    async fn test_uploaded_at_has_millisecond_precision() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let entry = service(&store, &config()).upload(upload("a.pdf")).await?;

        assert_eq!(entry.uploaded_at.len(), "2024-01-01T00:00:00.000Z".len());
        assert!(entry.uploaded_at.ends_with('Z'));
        let parsed: jiff::Timestamp = entry.uploaded_at.parse()?;
        assert_eq!(parsed.as_millisecond().to_string(), entry.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_identical_uploads_get_distinct_ids() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let service = service(&store, &config());

        let first = service.upload(upload("a.pdf")).await?;
        let second = service.upload(upload("a.pdf")).await?;

        assert_ne!(first.id, second.id);
        assert_eq!(index(&store).len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_lenient_read_failure_starts_fresh_index() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.fail_gets(Some(StoreErrorKind::ServiceUnavailable));

        let entry = service(&store, &config()).upload(upload("a.pdf")).await?;
        assert_eq!(index(&store), vec![serde_json::to_value(&entry)?]);
        Ok(())
    }

    #[tokio::test]
    async fn test_strict_read_failure_aborts() {
        let store = MemoryStore::new();
        store.fail_gets(Some(StoreErrorKind::Authentication));
        let mut config = config();
        config.index_read_policy = IndexReadPolicy::Strict;

        let error = service(&store, &config)
            .upload(upload("a.pdf"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), crate::ErrorKind::External);
        assert!(store.read(INDEX_PATH).is_none());
        assert_eq!(store.paths().len(), 1);
    }

    #[tokio::test]
    async fn test_strict_read_still_tolerates_missing_index() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let mut config = config();
        config.index_read_policy = IndexReadPolicy::Strict;

        service(&store, &config).upload(upload("a.pdf")).await?;
        assert_eq!(index(&store).len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unparsable_index_is_replaced() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.insert(INDEX_PATH, "not json");

        service(&store, &config()).upload(upload("a.pdf")).await?;
        assert_eq!(index(&store).len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_object_write_failure_skips_index() {
        let store = MemoryStore::new();
        let service = service(&store, &config());
        let error = service
            .upload(SurveyScoreUpload {
                file: "data:;base64,@@@".into(),
                ..upload("a.pdf")
            })
            .await
            .unwrap_err();

        assert_eq!(error.kind(), crate::ErrorKind::InvalidInput);
        assert_eq!(store.operation_count(), 0);
    }

    #[tokio::test]
    async fn test_index_conflict_without_retry_fails() {
        let store = MemoryStore::new();
        store.fail_next_put(INDEX_PATH, StoreErrorKind::Conflict);

        let error = service(&store, &config())
            .upload(upload("a.pdf"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), crate::ErrorKind::External);
        assert!(store.read(INDEX_PATH).is_none());
        // The stored file stays in place.
        assert_eq!(store.paths().len(), 1);
    }

    #[tokio::test]
    async fn test_index_conflict_is_retried_when_configured() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.fail_next_put(INDEX_PATH, StoreErrorKind::Conflict);
        let mut config = config();
        config.index_write_attempts = 2;

        let entry = service(&store, &config).upload(upload("a.pdf")).await?;

        assert_eq!(index(&store), vec![serde_json::to_value(&entry)?]);
        let index_reads = store
            .operations()
            .iter()
            .filter(|(op, path)| *op == Operation::Get && path == INDEX_PATH)
            .count();
        assert_eq!(index_reads, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_existing_placeholder_index_is_written_without_sha() {
        let store = MemoryStore::new();
        store.insert(INDEX_PATH, INDEX_PLACEHOLDER);

        // A literal `[]` counts as absent, so the write omits the token and
        // the store rejects it as a conflict.
        let error = service(&store, &config())
            .upload(upload("a.pdf"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::External);
    }
}
