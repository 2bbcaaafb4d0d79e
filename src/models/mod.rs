// Model exports
pub mod requests;
pub mod responses;

pub use requests::{AnalyzePopulationRequest, BugReportRequest, ContactRequest, FreelanceRequest};
pub use responses::{ErrorResponse, HealthResponse, PredictionResponse, SuccessResponse};
