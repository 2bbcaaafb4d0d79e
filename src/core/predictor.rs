use crate::core::model::Regressor;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// First year the model's trained domain covers
pub const MIN_YEAR: i64 = 2020;

/// Field name shared by the form and JSON encodings
pub const YEAR_FIELD: &str = "year";

/// Errors that can occur while turning a request into a prediction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("Missing 'year'")]
    MissingField,

    #[error("Year must be a number.")]
    NotANumber(String),

    #[error("Please enter a year after 2020.")]
    OutOfRange(i64),

    #[error("Model returned no prediction.")]
    EmptyOutput,

    #[error("Model returned a non-finite prediction.")]
    NonFinite(f64),

    #[error("Model invocation failed: {0}")]
    ModelFailure(String),
}

impl PredictError {
    /// HTTP status this error surfaces as
    pub fn status_code(&self) -> u16 {
        match self {
            PredictError::MissingField
            | PredictError::NotANumber(_)
            | PredictError::OutOfRange(_) => 400,
            PredictError::EmptyOutput
            | PredictError::NonFinite(_)
            | PredictError::ModelFailure(_) => 500,
        }
    }

    /// Extra diagnostic text for the error body, if any
    pub fn detail(&self) -> Option<String> {
        match self {
            PredictError::MissingField | PredictError::EmptyOutput => None,
            PredictError::NotANumber(raw) => Some(format!("got {:?}", raw)),
            PredictError::OutOfRange(year) => Some(format!("got {}", year)),
            PredictError::NonFinite(value) => Some(value.to_string()),
            PredictError::ModelFailure(msg) => Some(msg.clone()),
        }
    }
}

/// The year as it arrived, from either request encoding
#[derive(Debug, Clone, Default)]
pub struct YearInput {
    pub form: Option<String>,
    pub json: Option<Value>,
}

impl YearInput {
    pub fn from_form(mut fields: HashMap<String, String>) -> Self {
        Self {
            form: fields.remove(YEAR_FIELD),
            json: None,
        }
    }

    pub fn from_json(body: &Value) -> Self {
        Self {
            form: None,
            json: body.get(YEAR_FIELD).cloned(),
        }
    }

    /// Extract and validate the year. The form value wins when it is non-blank.
    pub fn year(&self) -> Result<i64, PredictError> {
        let year = match self.form.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_year_str(raw)?,
            _ => match &self.json {
                None | Some(Value::Null) => return Err(PredictError::MissingField),
                Some(Value::String(raw)) => {
                    let raw = raw.trim();
                    if raw.is_empty() {
                        return Err(PredictError::MissingField);
                    }
                    parse_year_str(raw)?
                }
                Some(Value::Number(n)) => number_to_year(n)?,
                Some(other) => return Err(PredictError::NotANumber(other.to_string())),
            },
        };

        if year < MIN_YEAR {
            return Err(PredictError::OutOfRange(year));
        }
        Ok(year)
    }
}

fn parse_year_str(raw: &str) -> Result<i64, PredictError> {
    raw.parse::<i64>()
        .map_err(|_| PredictError::NotANumber(raw.to_string()))
}

fn number_to_year(n: &serde_json::Number) -> Result<i64, PredictError> {
    if let Some(year) = n.as_i64() {
        return Ok(year);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
        _ => Err(PredictError::NotANumber(n.to_string())),
    }
}

/// A prediction as returned to the caller.
///
/// Normally the rounded integer. If the model's scalar cannot be represented
/// as an integer, the raw scalar is passed through instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictedValue {
    Integer(i64),
    Raw(f64),
}

/// Validate the input, run the model on a single-row single-feature input
/// and coerce its output.
pub fn predict(model: &dyn Regressor, input: &YearInput) -> Result<PredictedValue, PredictError> {
    let year = input.year()?;

    let rows = [vec![year as f64]];
    let output = model
        .predict(&rows)
        .map_err(|e| PredictError::ModelFailure(e.to_string()))?;

    let value = coerce_output(&output)?;
    tracing::debug!("Predicted {:?} for year {}", value, year);
    Ok(value)
}

/// Check the model output and round its first value to the nearest integer
pub fn coerce_output(output: &[f64]) -> Result<PredictedValue, PredictError> {
    let scalar = *output.first().ok_or(PredictError::EmptyOutput)?;
    if !scalar.is_finite() {
        return Err(PredictError::NonFinite(scalar));
    }

    // f64::round rounds half away from zero
    let rounded = scalar.round();
    if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(PredictedValue::Integer(rounded as i64))
    } else {
        Ok(PredictedValue::Raw(scalar))
    }
}
