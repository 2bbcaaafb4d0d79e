// Service exports
pub mod documents;
pub mod gemini;

pub use documents::{DocumentCollections, DocumentStore, DocumentStoreError};
pub use gemini::{analysis_payload, GeminiClient, GeminiError};
