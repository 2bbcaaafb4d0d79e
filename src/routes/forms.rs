use crate::error::ApiError;
use crate::models::{BugReportRequest, ContactRequest, FreelanceRequest, SuccessResponse};
use crate::routes::AppState;
use crate::services::DocumentStore;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use validator::Validate;

/// Configure form submission routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/contact", web::post().to(handle_contact))
        .route("/freelance_request", web::post().to(handle_freelance_request))
        .route("/report_bug", web::post().to(handle_bug_report));
}

fn store(state: &AppState) -> Result<&DocumentStore, ApiError> {
    state.documents.as_deref().ok_or(ApiError::StoreNotConfigured)
}

fn check<T: Validate>(req: &T, message: &str) -> Result<(), ApiError> {
    req.validate().map_err(|errors| {
        tracing::info!("Validation failed: field_errors={:?}", errors.field_errors().keys());
        ApiError::Validation(message.to_string())
    })
}

fn to_fields<T: Serialize>(req: &T) -> Map<String, Value> {
    match serde_json::to_value(req) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

async fn submit<T: Serialize>(
    store: &DocumentStore,
    route: &str,
    collection: &str,
    req: &T,
    success: &str,
) -> Result<HttpResponse, ApiError> {
    store.add(collection, to_fields(req)).await.map_err(|e| {
        tracing::error!("{} error: {}", route, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(SuccessResponse {
        success: success.to_string(),
    }))
}

/// POST /contact
async fn handle_contact(
    state: web::Data<AppState>,
    req: web::Json<ContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let store = store(&state)?;
    check(&*req, "All fields required.")?;
    submit(store, "/contact", &store.collections.contact, &*req, "Message sent!").await
}

/// POST /freelance_request
async fn handle_freelance_request(
    state: web::Data<AppState>,
    req: web::Json<FreelanceRequest>,
) -> Result<HttpResponse, ApiError> {
    let store = store(&state)?;
    check(&*req, "Missing required fields.")?;
    submit(
        store,
        "/freelance_request",
        &store.collections.freelance_requests,
        &*req,
        "Freelance request submitted!",
    )
    .await
}

/// POST /report_bug
async fn handle_bug_report(
    state: web::Data<AppState>,
    req: web::Json<BugReportRequest>,
) -> Result<HttpResponse, ApiError> {
    let store = store(&state)?;
    check(&*req, "Missing required fields.")?;
    submit(store, "/report_bug", &store.collections.bug_reports, &*req, "Bug reported!").await
}
