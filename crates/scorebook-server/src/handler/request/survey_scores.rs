use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::service::SurveyScoreUpload;
use crate::{Error, Result};

/// Request body of a survey-score upload.
///
/// Fields keep whatever JSON value the client sent so that absent, falsy and
/// oddly typed values are all reported by validation rather than as a
/// decoding error. A body that is valid JSON but not an object carries no
/// fields; only `null` is rejected while decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct UploadSurveyScore {
    /// Academic year, string or number; echoed verbatim into the index.
    pub year: Option<Value>,
    /// Semester code, e.g. `final2`.
    pub semester: Option<Value>,
    /// File content as `<meta>,<base64>`.
    pub file: Option<Value>,
    /// Original file name.
    pub file_name: Option<Value>,
    /// MIME type reported by the client. Accepted and ignored.
    pub file_type: Option<Value>,
}

impl TryFrom<Value> for UploadSurveyScore {
    type Error = String;

    fn try_from(body: Value) -> Result<Self, Self::Error> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            Value::Null => return Err("request body is null".to_owned()),
            _ => Map::new(),
        };

        Ok(Self {
            year: fields.remove("year"),
            semester: fields.remove("semester"),
            file: fields.remove("file"),
            file_name: fields.remove("fileName"),
            file_type: fields.remove("fileType"),
        })
    }
}

/// Returns whether a JSON value counts as present.
///
/// `null`, `false`, zero and the empty string are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(is_truthy)
}

/// Returns a field that must hold text.
fn text_field(value: Option<Value>, field: &'static str) -> Result<String> {
    match value {
        Some(Value::String(text)) => Ok(text),
        _ => Err(Error::invalid_input(format!("{field} must be a string"))),
    }
}

impl Validate for UploadSurveyScore {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [
            ("year", &self.year),
            ("semester", &self.semester),
            ("file", &self.file),
            ("fileName", &self.file_name),
        ] {
            if !is_present(value.as_ref()) {
                errors.add(field, ValidationError::new("required"));
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl UploadSurveyScore {
    /// Returns the file name when it was sent as text.
    pub fn file_name_text(&self) -> Option<&str> {
        self.file_name.as_ref().and_then(Value::as_str)
    }

    /// Returns the semester code when it was sent as text.
    pub fn semester_code(&self) -> Option<&str> {
        self.semester.as_ref().and_then(Value::as_str)
    }

    /// Converts a validated request into the service input.
    ///
    /// `file` and `fileName` must be strings. A numeric or boolean semester
    /// is used in its JSON text form.
    pub fn into_upload(self) -> Result<SurveyScoreUpload> {
        let semester = match self.semester {
            Some(Value::String(code)) => code,
            Some(code @ (Value::Number(_) | Value::Bool(_))) => code.to_string(),
            _ => return Err(Error::invalid_input("semester must be a string")),
        };

        Ok(SurveyScoreUpload {
            year: self.year.unwrap_or_default(),
            semester,
            file: text_field(self.file, "file")?,
            file_name: text_field(self.file_name, "fileName")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(value: Value) -> UploadSurveyScore {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> Value {
        json!({
            "year": "2024",
            "semester": "final2",
            "file": "data:application/pdf;base64,JVBERi0=",
            "fileName": "scores.pdf",
            "fileType": "application/pdf"
        })
    }

    #[test]
    fn test_complete_request_is_valid() {
        assert!(request(complete()).validate().is_ok());
    }

    #[test]
    fn test_numeric_year_is_valid() {
        let mut body = complete();
        body["year"] = json!(2024);
        assert!(request(body).validate().is_ok());
    }

    #[test]
    fn test_file_type_is_optional() {
        let mut body = complete();
        body.as_object_mut().unwrap().remove("fileType");
        assert!(request(body).validate().is_ok());
    }

    #[test]
    fn test_falsy_values_are_missing() {
        for (field, value) in [
            ("year", json!(null)),
            ("year", json!(0)),
            ("year", json!("")),
            ("year", json!(false)),
            ("semester", json!("")),
            ("file", json!("")),
            ("fileName", json!(null)),
        ] {
            let mut body = complete();
            body[field] = value;

            let errors = request(body).validate().unwrap_err();
            assert!(
                errors.field_errors().contains_key(field),
                "{field} should be reported"
            );
        }
    }

    #[test]
    fn test_absent_fields_are_all_reported() {
        let errors = request(json!({})).validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 4);
    }

    #[test]
    fn test_into_upload() {
        let upload = request(complete()).into_upload().unwrap();
        assert_eq!(upload.year, json!("2024"));
        assert_eq!(upload.semester, "final2");
        assert_eq!(upload.file_name, "scores.pdf");
    }

    #[test]
    fn test_file_type_of_any_type_is_ignored() {
        let mut body = complete();
        body["fileType"] = json!(7);

        let request = request(body);
        assert!(request.validate().is_ok());
        assert!(request.into_upload().is_ok());
    }

    #[test]
    fn test_numeric_semester_is_used_as_text() {
        let mut body = complete();
        body["semester"] = json!(2);

        let upload = request(body).into_upload().unwrap();
        assert_eq!(upload.semester, "2");
    }

    #[test]
    fn test_non_text_file_name_is_invalid_input() {
        let mut body = complete();
        body["fileName"] = json!(12);

        let request = request(body);
        assert!(request.validate().is_ok());

        let error = request.into_upload().unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::InvalidInput);
        assert_eq!(error.message(), "fileName must be a string");
    }

    #[test]
    fn test_non_object_body_has_no_fields() {
        for body in [json!([]), json!(5), json!("text"), json!(true)] {
            let errors = request(body).validate().unwrap_err();
            assert_eq!(errors.field_errors().len(), 4);
        }
    }

    #[test]
    fn test_null_body_fails_to_decode() {
        assert!(serde_json::from_str::<UploadSurveyScore>("null").is_err());
    }
}
