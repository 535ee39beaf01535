//! Embedding service client
//!
//! Text is embedded through the HuggingFace Inference API
//! feature-extraction pipeline. The [`Embedder`] trait is the seam used by
//! the index, so tests can substitute a deterministic embedder.

use crate::config::Config;
use crate::errors::{RagError, Result};
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

/// Base URL of the HuggingFace Inference API
const HF_API_BASE: &str = "https://api-inference.huggingface.co/pipeline/feature-extraction";

/// Embedding request timeout
const EMBED_TIMEOUT: Duration = Duration::from_secs(60);

/// Turns text into similarity-comparable vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            RagError::ExternalService("Embedding service returned no vectors".to_string())
        })
    }
}

/// Hosted embedding client against the HuggingFace Inference API
pub struct HuggingFaceEmbedder {
    client: reqwest::Client,
    api_token: String,
    model: String,
}

impl HuggingFaceEmbedder {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(EMBED_TIMEOUT)
            .build()
            .map_err(RagError::Http)?;

        Ok(Self {
            client,
            api_token: config.hf_api_token.clone(),
            model: config.embedding_model.clone(),
        })
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/{}", HF_API_BASE, self.model);
        let body = json!({
            "inputs": texts,
            "options": { "wait_for_model": true }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                RagError::ExternalService(format!("Embedding request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RagError::ExternalService(format!(
                "Embedding service returned HTTP {}: {}",
                status, detail
            )));
        }

        let vectors: Vec<Vec<f32>> = response.json().await.map_err(|e| {
            RagError::ExternalService(format!("Failed to parse embedding response: {}", e))
        })?;

        if vectors.len() != texts.len() {
            return Err(RagError::ExternalService(format!(
                "Embedding service returned {} vectors for {} inputs",
                vectors.len(),
                texts.len()
            )));
        }

        Ok(vectors)
    }
}
