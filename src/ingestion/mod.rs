//! Document ingestion: source resolution, loading, and chunking

pub mod chunker;
pub mod loader;
pub mod source;

pub use chunker::TextChunker;
pub use loader::DocumentLoader;
pub use source::SourceDescriptor;
