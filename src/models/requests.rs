use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

/// Request to analyze a forecast population figure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzePopulationRequest {
    #[serde(default)]
    pub year: Value,
    #[serde(default)]
    pub population: Value,
}

impl AnalyzePopulationRequest {
    /// Both fields as text, or `None` if either one is missing or falsy
    pub fn fields(&self) -> Option<(String, String)> {
        Some((present_text(&self.year)?, present_text(&self.population)?))
    }
}

fn present_text(value: &Value) -> Option<String> {
    match value {
        _ if !is_truthy(value) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Loose presence check used by every form: null, `false`, zero, the empty
/// string and empty arrays/objects count as missing. Whitespace does not.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

fn required(value: &Value) -> Result<(), ValidationError> {
    if is_truthy(value) {
        Ok(())
    } else {
        Err(ValidationError::new("required"))
    }
}

/// Contact form submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub name: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub email: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub message: Value,
}

/// Freelance work request. Values are stored as sent, extra fields included.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FreelanceRequest {
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub name: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub mobile: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub email: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub work_type: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub deadline: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub client_type: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bug report. Values are stored as sent, extra fields included.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BugReportRequest {
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub name: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub email: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub mobile: Value,
    #[validate(custom(function = "required"))]
    #[serde(default)]
    pub issue: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
