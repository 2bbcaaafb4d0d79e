use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the generative-language API
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

/// Client for the generative-language `generateContent` endpoint.
///
/// Request bodies are forwarded as-is and the upstream JSON is returned
/// untouched; this client does not interpret either.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    pub fn new(endpoint: String, model: String, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            endpoint,
            model,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn generate_url(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            urlencoding::encode(api_key)
        )
    }

    /// Forward a raw `generateContent` payload
    pub async fn generate(&self, payload: &Value) -> Result<Value, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::NotConfigured)?;

        let response = self
            .client
            .post(self.generate_url(api_key))
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Gemini request failed: {} - {}", status, body);
            return Err(GeminiError::ApiError(format!("generateContent returned {}", status)));
        }

        Ok(response.json().await?)
    }

    /// Ask for an analysis of a forecast population figure
    pub async fn analyze_population(&self, year: &str, population: &str) -> Result<Value, GeminiError> {
        let payload = analysis_payload(year, population);
        tracing::debug!("Requesting population analysis for {}", year);
        self.generate(&payload).await
    }
}

/// Single-turn `generateContent` body for a population analysis
pub fn analysis_payload(year: &str, population: &str) -> Value {
    let prompt = format!(
        "Analyze India's socio-economic implications if population reaches {} in {}.",
        population, year
    );
    json!({ "contents": [{ "parts": [{ "text": prompt }] }] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let client = GeminiClient::new(
            "https://gemini.test/v1beta/".to_string(),
            "flash".to_string(),
            Some("k&y".to_string()),
            Duration::from_secs(5),
        );
        assert!(client.is_configured());
        assert_eq!(
            client.generate_url("k&y"),
            "https://gemini.test/v1beta/models/flash:generateContent?key=k%26y"
        );
    }

    #[test]
    fn test_blank_key_is_unconfigured() {
        let client = GeminiClient::new(
            "https://gemini.test".to_string(),
            "flash".to_string(),
            Some(" ".to_string()),
            Duration::from_secs(5),
        );
        assert!(!client.is_configured());
    }

    #[test]
    fn test_analysis_payload() {
        let payload = analysis_payload("2030", "1500000000");
        assert_eq!(
            payload["contents"][0]["parts"][0]["text"],
            "Analyze India's socio-economic implications if population reaches 1500000000 in 2030."
        );
    }
}
