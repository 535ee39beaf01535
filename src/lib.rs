//! askdocs - a retrieval-augmented question-answering agent
//!
//! Ingests documents from URLs, PDF directories and text files, indexes
//! them in an in-memory embedding index, and answers questions through a
//! bounded tool-calling agent backed by a hosted LLM.
//!
//! # Architecture
//!
//! - `ingestion`: source resolution, document loading, chunking
//! - `index`: embedding client and cosine similarity index
//! - `llm`: chat model types and the Groq client
//! - `agent`: phase machine, tools, and the ReAct loop
//! - `workflow`: the retrieve→respond pipeline

pub mod errors;
pub mod types;

pub mod config;
pub mod ingestion;

pub mod index;
pub mod llm;

pub mod agent;
pub mod workflow;

pub mod cli;

// Re-export commonly used types
pub use config::Config;
pub use errors::{RagError, Result};
