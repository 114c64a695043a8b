//! API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::draft::TaskRequest;

/// Body of `POST /api/generate-task`.
///
/// Fields are kept as raw JSON so that any falsy value (missing, `null`,
/// `false`, `0`, `""`) is answered with the validation envelope rather than
/// a decoding error.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTaskRequest {
    #[serde(default)]
    pub title: Value,

    #[serde(default)]
    pub description: Value,
}

impl GenerateTaskRequest {
    /// Convert into a [`TaskRequest`]. Falsy fields become empty strings and
    /// other scalars their JSON text; arrays and objects are rejected.
    pub fn into_task_request(self) -> Result<TaskRequest, String> {
        Ok(TaskRequest::new(
            field_text("title", self.title)?,
            field_text("description", self.description)?,
        ))
    }
}

fn field_text(name: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Null | Value::Bool(false) => Ok(String::new()),
        Value::Number(n) if n.as_f64() == Some(0.0) => Ok(String::new()),
        Value::Bool(true) | Value::Number(_) => Ok(value.to_string()),
        Value::Array(_) | Value::Object(_) => Err(format!("{} must be a string", name)),
    }
}

/// Fixed error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Active draft generator strategy
    pub generator: String,
}
