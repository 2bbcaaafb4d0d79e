use crate::core::{LoadError, PredictError};
use crate::models::ErrorResponse;
use crate::services::{DocumentStoreError, GeminiError};
use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

/// Every failure a handler can surface, rendered as `{error, detail?}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Machine learning model is not loaded.")]
    ModelUnavailable(#[from] LoadError),

    #[error(transparent)]
    Prediction(#[from] PredictError),

    #[error("invalid_json")]
    InvalidJson(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gemini(#[from] GeminiError),

    #[error("Database not configured.")]
    StoreNotConfigured,

    #[error(transparent)]
    Store(#[from] DocumentStoreError),
}

impl ApiError {
    fn detail(&self) -> Option<String> {
        match self {
            ApiError::ModelUnavailable(e) => Some(e.to_string()),
            ApiError::Prediction(e) => e.detail(),
            ApiError::InvalidJson(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Prediction(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::InvalidJson(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable(_)
            | ApiError::Gemini(_)
            | ApiError::StoreNotConfigured
            | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            detail: self.detail(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidJson(format!("Invalid JSON: {}", err)).into()
}
