//! Error types for the askdocs RAG system
//!
//! Provides the full error taxonomy for ingestion, indexing and the
//! agent loop, with context propagation via `thiserror`.

use thiserror::Error;

/// Main error type for the RAG system
#[derive(Error, Debug)]
pub enum RagError {
    /// Required credential or invalid parameter at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ingestion descriptor matches none of the recognized source kinds
    #[error("Unsupported source type: {descriptor}. Use a URL, a .txt file, or a PDF directory")]
    UnsupportedSource { descriptor: String },

    /// Index build attempted with zero chunks
    #[error("Cannot build index from an empty corpus")]
    EmptyCorpus,

    /// Query attempted before a successful build
    #[error("Not initialized: call build() before querying")]
    NotInitialized,

    /// Failure from the embedding service, LLM, document fetch, or knowledge lookup
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Agent state machine transition errors
    #[error("Invalid agent phase transition from {from} to {to}")]
    InvalidPhase { from: String, to: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Convert anyhow errors to RagError
impl From<anyhow::Error> for RagError {
    fn from(err: anyhow::Error) -> Self {
        RagError::ExternalService(err.to_string())
    }
}
