//! In-memory embedding index
//!
//! Build-once, query-many similarity index over chunk embeddings with
//! cosine ranking. Append-only: no update or delete path; rebuilding
//! replaces the whole entry set. Not synchronized against concurrent
//! builders.

use crate::errors::{RagError, Result};
use crate::index::Embedder;
use crate::types::Chunk;
use std::sync::Arc;

/// One indexed (vector, chunk) pair
#[derive(Debug, Clone)]
struct IndexEntry {
    embedding: Vec<f32>,
    chunk: Chunk,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    entries: Option<Vec<IndexEntry>>,
}

impl EmbeddingIndex {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: None,
        }
    }

    /// Embed every chunk and construct the queryable index.
    ///
    /// Must be called before any query. Rebuilding discards previous
    /// entries. Fails on an empty chunk collection.
    pub async fn build(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        let entries = vectors
            .into_iter()
            .zip(chunks)
            .map(|(embedding, chunk)| IndexEntry { embedding, chunk })
            .collect();

        self.entries = Some(entries);
        Ok(())
    }

    /// Whether a successful build has happened
    pub fn is_built(&self) -> bool {
        self.entries.is_some()
    }

    /// Number of indexed chunks
    pub fn len(&self) -> usize {
        self.entries.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embed the query and return the `k` most similar chunks, best first.
    ///
    /// Only the top-k set under cosine similarity is contractual; ties keep
    /// insertion order (stable sort).
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        let entries = self.entries.as_ref().ok_or(RagError::NotInitialized)?;

        let query_embedding = self.embedder.embed(query).await?;

        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&query_embedding, &entry.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored)
    }
}

/// Cosine similarity between two vectors; 0.0 when either has zero norm
/// or the dimensions disagree
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
