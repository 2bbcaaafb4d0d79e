use crate::core::{ModelStatus, PredictedValue};
use serde::Serialize;

/// Response for the prediction endpoint. The field name is kept for the
/// existing frontend.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub predicted_population: PredictedValue,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: ModelStatus,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Form submission acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: String,
}
