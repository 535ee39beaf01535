//! Core document types shared across ingestion, indexing and retrieval

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provenance attached to every document and chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Origin identifier: URL or filesystem path
    pub source: String,

    /// Page or document title, when the loader could determine one
    pub title: Option<String>,
}

impl SourceMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Best human-readable label: title when present, source otherwise
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.source)
    }
}

/// A unit of loaded text. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: SourceMetadata,
}

impl Document {
    pub fn new(text: impl Into<String>, metadata: SourceMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A document-derived text segment produced by the chunker.
/// Carries the parent document's metadata. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub text: String,
    /// Position of this chunk within its parent document
    pub index: usize,
    pub metadata: SourceMetadata,
}

impl Chunk {
    pub fn new(text: impl Into<String>, index: usize, metadata: SourceMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            index,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_title() {
        let meta = SourceMetadata::new("https://example.com/post").with_title("A Post");
        assert_eq!(meta.label(), "A Post");

        let meta = SourceMetadata::new("data/notes.txt");
        assert_eq!(meta.label(), "data/notes.txt");
    }

    #[test]
    fn test_chunk_carries_parent_metadata() {
        let meta = SourceMetadata::new("data/notes.txt").with_title("Notes");
        let chunk = Chunk::new("some text", 0, meta.clone());
        assert_eq!(chunk.metadata, meta);
        assert_eq!(chunk.index, 0);
    }
}
