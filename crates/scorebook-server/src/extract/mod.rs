//! Request extractors with error handling that matches the API's error model.
//!
//! - [`Json`] - JSON deserialization; decode failures become upload errors (500)
//! - [`ValidateJson`] - JSON extraction followed by `validator` validation

mod json;
mod validated_json;

pub use crate::extract::json::Json;
pub use crate::extract::validated_json::ValidateJson;
