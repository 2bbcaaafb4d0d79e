use crate::error::ApiError;
use crate::models::AnalyzePopulationRequest;
use crate::routes::AppState;
use crate::services::GeminiError;
use actix_web::{web, HttpResponse};
use serde_json::Value;

/// Configure generative-language proxy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/api/chat", web::post().to(chat_proxy))
        .route("/api/analyze_population", web::post().to(analyze_population));
}

/// Forward a chat payload to the generative-language API unchanged
async fn chat_proxy(
    state: web::Data<AppState>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let response = state.gemini.generate(&payload).await.map_err(|e| {
        log_upstream_error("/api/chat", &e);
        e
    })?;
    Ok(HttpResponse::Ok().json(response))
}

/// Ask for an analysis of a forecast
///
/// POST /api/analyze_population
///
/// Request body:
/// ```json
/// { "year": 2030, "population": 1500000000 }
/// ```
async fn analyze_population(
    state: web::Data<AppState>,
    req: web::Json<AnalyzePopulationRequest>,
) -> Result<HttpResponse, ApiError> {
    if !state.gemini.is_configured() {
        return Err(GeminiError::NotConfigured.into());
    }

    let (year, population) = req
        .fields()
        .ok_or_else(|| ApiError::Validation("Year and population are required.".to_string()))?;

    let response = state
        .gemini
        .analyze_population(&year, &population)
        .await
        .map_err(|e| {
            log_upstream_error("/api/analyze_population", &e);
            e
        })?;
    Ok(HttpResponse::Ok().json(response))
}

fn log_upstream_error(route: &str, err: &GeminiError) {
    match err {
        GeminiError::NotConfigured => tracing::warn!("{} called without GEMINI_API_KEY", route),
        _ => tracing::error!("{} error: {}", route, err),
    }
}
