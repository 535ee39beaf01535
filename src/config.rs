//! Runtime configuration
//!
//! Built once from the environment at process start and passed by reference
//! to every component constructor. No other module reads environment state.

use crate::errors::{RagError, Result};
use serde::{Deserialize, Serialize};

/// Default LLM served by Groq
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

/// Default embedding model on the HuggingFace Inference API
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default chunking parameters
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Seed URLs used when no sources are given on the command line
pub const DEFAULT_URLS: [&str; 2] = [
    "https://lilianweng.github.io/posts/2023-06-23-agent/",
    "https://lilianweng.github.io/posts/2024-04-12-diffusion-video/",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Groq API credential (required)
    pub groq_api_key: String,

    /// HuggingFace Inference API credential (required)
    pub hf_api_token: String,

    /// Chat model identifier
    pub llm_model: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Overlap between adjacent chunks in characters
    pub chunk_overlap: usize,

    /// Seed URL list
    pub default_urls: Vec<String>,

    /// Enable diagnostic output
    pub verbose: bool,
}

impl Config {
    /// Build configuration from the environment.
    ///
    /// Fails eagerly with a configuration error when a required credential
    /// is missing, before any query is attempted.
    pub fn from_env() -> Result<Self> {
        let groq_api_key = require_env("GROQ_API_KEY")?;
        let hf_api_token = require_env("HUGGINGFACEHUB_API_TOKEN")?;

        let llm_model = optional_env("RAG_LLM_MODEL")
            .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string());
        let embedding_model = optional_env("RAG_EMBEDDING_MODEL")
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());

        let chunk_size = parse_env("RAG_CHUNK_SIZE", DEFAULT_CHUNK_SIZE)?;
        let chunk_overlap = parse_env("RAG_CHUNK_OVERLAP", DEFAULT_CHUNK_OVERLAP)?;

        let config = Self {
            groq_api_key,
            hf_api_token,
            llm_model,
            embedding_model,
            chunk_size,
            chunk_overlap,
            default_urls: DEFAULT_URLS.iter().map(|s| s.to_string()).collect(),
            verbose: false,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate chunking parameters
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Enable verbose diagnostics
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Construct a configuration with explicit credentials.
    ///
    /// Used by tests and by callers that manage credentials themselves.
    pub fn with_credentials(groq_api_key: String, hf_api_token: String) -> Result<Self> {
        if groq_api_key.is_empty() {
            return Err(RagError::Config("GROQ_API_KEY is not set".to_string()));
        }
        if hf_api_token.is_empty() {
            return Err(RagError::Config(
                "HUGGINGFACEHUB_API_TOKEN is not set".to_string(),
            ));
        }

        Ok(Self {
            groq_api_key,
            hf_api_token,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            default_urls: DEFAULT_URLS.iter().map(|s| s.to_string()).collect(),
            verbose: false,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RagError::Config(format!("{} is not set", key))),
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env(key: &str, default: usize) -> Result<usize> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| RagError::Config(format!("{} must be a positive integer, got '{}'", key, raw))),
        None => Ok(default),
    }
}
