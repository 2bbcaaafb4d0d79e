use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while invoking a loaded regressor
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("feature mismatch: model expects {expected} features, row has {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}

/// Anything that can turn a batch of feature rows into one output per row
pub trait Regressor: Debug + Send + Sync {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError>;
}

/// Shared, immutable handle to a loaded model
pub type ModelHandle = Arc<dyn Regressor>;

/// Serialized regression artifact.
///
/// Artifacts are JSON documents tagged by `kind`. Named fields make schema
/// mismatches fail at decode time, which the resolver reports as a corrupt
/// candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegressionArtifact {
    /// `y = intercept + sum(coefficients[i] * x[i])`
    Linear { coefficients: Vec<f64>, intercept: f64 },
    /// Single-feature polynomial in `(x - offset)`, ascending degree from 1
    Polynomial {
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        offset: f64,
    },
}

impl RegressionArtifact {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn into_handle(self) -> ModelHandle {
        Arc::new(self)
    }

    fn n_features(&self) -> usize {
        match self {
            RegressionArtifact::Linear { coefficients, .. } => coefficients.len(),
            RegressionArtifact::Polynomial { .. } => 1,
        }
    }

    fn evaluate(&self, row: &[f64]) -> f64 {
        match self {
            RegressionArtifact::Linear { coefficients, intercept } => {
                intercept + coefficients.iter().zip(row).map(|(c, x)| c * x).sum::<f64>()
            }
            RegressionArtifact::Polynomial { coefficients, intercept, offset } => {
                let x = row[0] - offset;
                // Horner, highest degree first
                let poly = coefficients.iter().rev().fold(0.0, |acc, c| (acc + c) * x);
                intercept + poly
            }
        }
    }
}

impl Regressor for RegressionArtifact {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ModelError> {
        let expected = self.n_features();
        rows.iter()
            .map(|row| {
                if row.len() != expected {
                    return Err(ModelError::FeatureMismatch { expected, actual: row.len() });
                }
                Ok(self.evaluate(row))
            })
            .collect()
    }
}
