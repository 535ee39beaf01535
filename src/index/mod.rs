//! Embedding and similarity search

pub mod embeddings;
pub mod store;

pub use embeddings::{Embedder, HuggingFaceEmbedder};
pub use store::{EmbeddingIndex, ScoredChunk};
