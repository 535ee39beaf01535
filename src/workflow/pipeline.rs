//! Two-stage RAG workflow
//!
//! A fixed pipeline over [`RagState`]: `retrieve` then `respond`, no
//! branching and no recovery edges. The retrieve stage queries the index
//! directly with the raw question; the respond stage runs the agent,
//! which re-derives relevant chunks through its own `document_search`
//! tool. The two retrieval paths are deliberately independent.

use crate::agent::ReactAgent;
use crate::errors::Result;
use crate::index::EmbeddingIndex;
use crate::workflow::RagState;
use std::sync::Arc;

/// Chunks fetched by the retrieve stage
const RETRIEVE_TOP_K: usize = 4;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Top-k for the retrieve stage
    pub retrieve_top_k: usize,

    /// Enable diagnostic output
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retrieve_top_k: RETRIEVE_TOP_K,
            verbose: false,
        }
    }
}

pub struct RagPipeline {
    index: Arc<EmbeddingIndex>,
    agent: ReactAgent,
    config: PipelineConfig,
}

impl RagPipeline {
    pub fn new(index: Arc<EmbeddingIndex>, agent: ReactAgent, config: PipelineConfig) -> Self {
        Self {
            index,
            agent,
            config,
        }
    }

    /// Prepare the pipeline. Idempotent; safe to call repeatedly.
    pub fn build(&mut self) -> Result<()> {
        self.agent.build()
    }

    /// Run retrieve → respond for one question.
    ///
    /// Failures in either stage propagate to the caller uncaught; the
    /// only swallowed condition is the agent's sentinel fallback answer.
    pub async fn run(&self, question: &str) -> Result<RagState> {
        let state = RagState::new(question);
        let state = self.retrieve(state).await?;
        self.respond(state).await
    }

    /// Stage 1: direct index retrieval with the raw question
    async fn retrieve(&self, state: RagState) -> Result<RagState> {
        let docs = self
            .index
            .retrieve(&state.question, self.config.retrieve_top_k)
            .await?;

        if self.config.verbose {
            eprintln!("[PIPELINE] retrieve: {} candidate chunks", docs.len());
        }

        Ok(state.with_retrieved(docs))
    }

    /// Stage 2: agent answer
    async fn respond(&self, state: RagState) -> Result<RagState> {
        let result = self.agent.run(&state.question).await?;

        if self.config.verbose {
            eprintln!(
                "[PIPELINE] respond: {} model round-trips, {} tool calls",
                result.iterations,
                result.tool_trace.len()
            );
        }

        Ok(state.with_answer(result.answer, result.tool_trace))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::wikipedia::KnowledgeSource;
    use crate::agent::{AgentConfig, AgentToolkit};
    use crate::errors::RagError;
    use crate::index::Embedder;
    use crate::llm::{ChatMessage, ChatModel, ChatOutcome, ToolSchema};
    use crate::types::{Chunk, SourceMetadata};
    use async_trait::async_trait;

    struct LengthEmbedder;

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    struct OneShotModel;

    #[async_trait]
    impl ChatModel for OneShotModel {
        async fn chat(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolSchema],
        ) -> Result<ChatOutcome> {
            Ok(ChatOutcome::Text("A direct answer.".to_string()))
        }
    }

    struct CannedLookup;

    #[async_trait]
    impl KnowledgeSource for CannedLookup {
        async fn lookup(&self, query: &str) -> Result<String> {
            Ok(format!("Encyclopedia entry about {}", query))
        }
    }

    async fn built_index(texts: &[&str]) -> Arc<EmbeddingIndex> {
        let mut index = EmbeddingIndex::new(Arc::new(LengthEmbedder));
        let chunks = texts
            .iter()
            .map(|t| Chunk::new(*t, 0, SourceMetadata::new("test://corpus")))
            .collect();
        index.build(chunks).await.unwrap();
        Arc::new(index)
    }

    fn pipeline(index: Arc<EmbeddingIndex>) -> RagPipeline {
        let toolkit = AgentToolkit::new(index.clone(), Arc::new(CannedLookup));
        let agent = ReactAgent::new(Arc::new(OneShotModel), toolkit, AgentConfig::default());
        let mut pipeline = RagPipeline::new(index, agent, PipelineConfig::default());
        pipeline.build().unwrap();
        pipeline
    }

    #[tokio::test]
    async fn test_run_fills_both_stages() {
        let index = built_index(&["Paris is the capital of France", "Dogs are mammals"]).await;
        let pipeline = pipeline(index);

        let state = pipeline.run("What is the capital of France?").await.unwrap();

        assert_eq!(state.question, "What is the capital of France?");
        let docs = state.retrieved_docs.expect("retrieve stage must run");
        assert!(!docs.is_empty());
        assert!(docs.len() <= RETRIEVE_TOP_K);
        assert_eq!(state.answer.as_deref(), Some("A direct answer."));
    }

    #[tokio::test]
    async fn test_unbuilt_index_propagates_uncaught() {
        let index = Arc::new(EmbeddingIndex::new(Arc::new(LengthEmbedder)));
        let pipeline = pipeline(index);

        let err = pipeline.run("question").await.unwrap_err();
        assert!(matches!(err, RagError::NotInitialized));
    }

    #[tokio::test]
    async fn test_build_is_idempotent() {
        let index = built_index(&["some text"]).await;
        let toolkit = AgentToolkit::new(index.clone(), Arc::new(CannedLookup));
        let agent = ReactAgent::new(Arc::new(OneShotModel), toolkit, AgentConfig::default());
        let mut pipeline = RagPipeline::new(index, agent, PipelineConfig::default());

        pipeline.build().unwrap();
        pipeline.build().unwrap();
        assert!(pipeline.run("question").await.is_ok());
    }
}
