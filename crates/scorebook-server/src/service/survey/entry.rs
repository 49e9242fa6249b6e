use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One record of the survey-score index.
///
/// Fields serialize in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyScoreEntry {
    /// Upload id, decimal milliseconds since the Unix epoch.
    pub id: String,
    /// Academic year exactly as submitted.
    pub year: Value,
    /// Semester code exactly as submitted.
    pub semester: String,
    /// Label of the semester code.
    pub semester_text: String,
    /// Original file name.
    pub file_name: String,
    /// Public raw-content address of the stored file.
    pub url: String,
    /// Processing time, ISO-8601 UTC with millisecond precision.
    pub uploaded_at: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialized_key_order() {
        let entry = SurveyScoreEntry {
            id: "1700000000000".into(),
            year: json!(2024),
            semester: "mid1".into(),
            semester_text: "Giữa HK1".into(),
            file_name: "a.pdf".into(),
            url: "https://raw.githubusercontent.com/o/r/main/data/survey-scores/1700000000000.pdf"
                .into(),
            uploaded_at: "2023-11-14T22:13:20.000Z".into(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let keys = [
            "\"id\"",
            "\"year\"",
            "\"semester\"",
            "\"semesterText\"",
            "\"fileName\"",
            "\"url\"",
            "\"uploadedAt\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"year\":2024"));
    }
}
