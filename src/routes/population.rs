use crate::core::{predict, ModelStatus, YearInput};
use crate::error::ApiError;
use crate::models::{HealthResponse, PredictionResponse};
use crate::routes::AppState;
use actix_web::{web, Either, HttpResponse, Responder};
use serde_json::Value;
use std::collections::HashMap;

/// Configure health and prediction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/population_india", web::post().to(predict_population));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let model = state.resolver.status().await;
    let status = if model == ModelStatus::Loaded { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        model,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Population forecast endpoint
///
/// POST /population_india
///
/// Accepts `year` either form-encoded or in a JSON body:
/// ```json
/// { "year": 2030 }
/// ```
/// and answers `{ "predicted_population": <integer> }`.
async fn predict_population(
    state: web::Data<AppState>,
    body: Either<web::Form<HashMap<String, String>>, web::Bytes>,
) -> Result<HttpResponse, ApiError> {
    // A failed earlier load is retried here
    let model = state.resolver.ensure_loaded().await?;

    let input = match body {
        Either::Left(form) => YearInput::from_form(form.into_inner()),
        Either::Right(bytes) => {
            let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            YearInput::from_json(&json)
        }
    };

    let predicted = predict(model.as_ref(), &input).map_err(|e| {
        if e.status_code() >= 500 {
            tracing::error!("/population_india error: {}", e);
        } else {
            tracing::info!("Rejected prediction request: {}", e);
        }
        e
    })?;

    Ok(HttpResponse::Ok().json(PredictionResponse {
        predicted_population: predicted,
    }))
}
