use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when writing to the document store
#[derive(Debug, Error)]
pub enum DocumentStoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or project")]
    Unauthorized,
}

/// Collection IDs for stored form submissions
#[derive(Debug, Clone)]
pub struct DocumentCollections {
    pub contact: String,
    pub freelance_requests: String,
    pub bug_reports: String,
}

impl Default for DocumentCollections {
    fn default() -> Self {
        Self {
            contact: "submissions".to_string(),
            freelance_requests: "freelance_requests".to_string(),
            bug_reports: "bug_reports".to_string(),
        }
    }
}

/// REST client for the document store holding form submissions
///
/// Speaks the Appwrite databases API (`X-Appwrite-*` auth headers).
pub struct DocumentStore {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    pub collections: DocumentCollections,
}

impl DocumentStore {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections: DocumentCollections::default(),
        }
    }

    /// Add a document to a collection, stamped with an id and a UTC timestamp.
    /// Returns the generated document id.
    pub async fn add(&self, collection: &str, fields: Map<String, Value>) -> Result<String, DocumentStoreError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        );

        let document_id = uuid::Uuid::new_v4().to_string();
        let mut data = fields;
        data.insert("timestamp".to_string(), Value::String(chrono::Utc::now().to_rfc3339()));

        let payload = serde_json::json!({
            "documentId": document_id,
            "data": data,
        });

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DocumentStoreError::Unauthorized);
        }
        if !status.is_success() {
            return Err(DocumentStoreError::ApiError(format!(
                "Failed to add document to {}: {}",
                collection, status
            )));
        }

        tracing::debug!("Stored document {} in {}", document_id, collection);
        Ok(document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_store_creation() {
        let store = DocumentStore::new(
            "https://docs.test/v1".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            Duration::from_secs(5),
        );

        assert_eq!(store.base_url, "https://docs.test/v1");
        assert_eq!(store.api_key, "test_key");
        assert_eq!(store.collections.contact, "submissions");
    }
}
