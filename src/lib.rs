//! Popcast - population forecasting service
//!
//! This library provides the model resolution and prediction pipeline behind
//! the `/population_india` endpoint, plus thin clients for the generative
//! analysis proxy and the form-submission document store.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    predict, LoadError, ModelHandle, ModelResolver, ModelSource, PredictError, PredictedValue,
    RegressionArtifact, Regressor, YearInput,
};
pub use error::ApiError;
pub use routes::AppState;
