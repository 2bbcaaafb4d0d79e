// Core prediction pipeline exports
pub mod model;
pub mod predictor;
pub mod resolver;

pub use model::{ModelError, ModelHandle, RegressionArtifact, Regressor};
pub use predictor::{coerce_output, predict, PredictError, PredictedValue, YearInput, MIN_YEAR};
pub use resolver::{
    load_first_candidate, ArtifactStore, LoadError, LocalFs, ModelResolver, ModelSource,
    ModelStatus, RemoteSource, ResolutionState, DEFAULT_ARTIFACT_NAMES,
};
