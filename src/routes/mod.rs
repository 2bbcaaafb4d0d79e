// Route exports
pub mod analysis;
pub mod forms;
pub mod population;

use crate::core::ModelResolver;
use crate::services::{DocumentStore, GeminiClient};
use actix_web::web;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ModelResolver>,
    pub gemini: Arc<GeminiClient>,
    pub documents: Option<Arc<DocumentStore>>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(population::configure)
        .configure(analysis::configure)
        .configure(forms::configure);
}
