use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use popcast::config::Settings;
use popcast::core::ModelResolver;
use popcast::error::handle_json_payload_error;
use popcast::routes::{self, AppState};
use popcast::services::{DocumentStore, GeminiClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Popcast service...");

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    // Resolve the model eagerly; a failure here is retried on the first request
    let resolver = Arc::new(ModelResolver::new(settings.model.source()));
    resolver.warm_up().await;

    let gemini = Arc::new(GeminiClient::new(
        settings.gemini.endpoint.clone(),
        settings.gemini.model.clone(),
        settings.gemini.api_key.clone(),
        Duration::from_secs(settings.gemini.timeout_secs),
    ));
    if !gemini.is_configured() {
        warn!("GEMINI_API_KEY not found. /api/chat and /api/analyze_population will fail.");
    }

    let documents = settings.documents.as_ref().map(|docs| {
        Arc::new(DocumentStore::new(
            docs.endpoint.clone(),
            docs.api_key.clone(),
            docs.project_id.clone(),
            docs.database_id.clone(),
            Duration::from_secs(docs.timeout_secs),
        ))
    });
    match &documents {
        Some(_) => info!("Document store client initialized"),
        None => warn!("Document store not configured, form submissions will be rejected"),
    }

    // Build application state
    let app_state = AppState {
        resolver,
        gemini,
        documents,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
