//! Error types for template synthesis

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// The source document could not be fetched or parsed
    #[error("Failed to fetch or parse API document: {0}")]
    Document(#[from] openapi_ingest::IngestError),

    /// The persistence collaborator rejected a processed endpoint
    #[error("Failed to persist processed endpoint: {0}")]
    Persistence(String),

    /// A synthesized payload could not be encoded as JSON
    #[error("Failed to encode template payload: {0}")]
    Encode(#[from] serde_json::Error),
}
