use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::{Error, Result};

/// Directory holding uploaded survey-score files.
pub const OBJECT_DIRECTORY: &str = "data/survey-scores";

/// Extension used when the file name has none.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Returns the text after the last `.` of a file name.
///
/// Falls back to [`DEFAULT_EXTENSION`] when there is no `.` or nothing
/// follows it.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => extension,
        _ => DEFAULT_EXTENSION,
    }
}

/// Returns the repository path of an uploaded file.
pub fn object_path(id: i64, file_name: &str) -> String {
    format!("{OBJECT_DIRECTORY}/{id}.{}", file_extension(file_name))
}

/// Extracts the base64 payload of a `<meta>,<base64>` file field.
///
/// A field without a comma carries no payload and is rejected. Whitespace
/// is removed, and the rest must be standard base64.
pub fn file_payload(file: &str) -> Result<String> {
    let Some((_, payload)) = file.split_once(',') else {
        return Err(Error::invalid_input(
            "file must have the form <meta>,<base64>",
        ));
    };

    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    STANDARD.decode(&payload).map_err(|error| {
        Error::invalid_input(format!("file payload is not valid base64: {error}"))
            .with_source(error)
    })?;

    Ok(payload)
}
