//! Agent tool definitions and execution
//!
//! Two registered capabilities:
//! - `document_search`: top-k retrieval from the embedding index
//! - `knowledge_lookup`: encyclopedia search for general knowledge
//!
//! Malformed or unknown invocations are answered with a corrective tool
//! result instead of aborting the loop; genuine service failures still
//! propagate as errors.

use crate::errors::Result;
use crate::index::EmbeddingIndex;
use crate::llm::{ToolCall, ToolSchema};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::wikipedia::KnowledgeSource;

pub const DOCUMENT_SEARCH: &str = "document_search";
pub const KNOWLEDGE_LOOKUP: &str = "knowledge_lookup";

/// Passages fetched per document_search call
const DOCUMENT_SEARCH_TOP_K: usize = 8;

/// Tool result when retrieval matches nothing
const NO_DOCUMENTS: &str = "No documents found.";

#[derive(Debug, Deserialize)]
struct QueryArgs {
    query: String,
}

pub struct AgentToolkit {
    index: Arc<EmbeddingIndex>,
    knowledge: Arc<dyn KnowledgeSource>,
}

impl AgentToolkit {
    pub fn new(index: Arc<EmbeddingIndex>, knowledge: Arc<dyn KnowledgeSource>) -> Self {
        Self { index, knowledge }
    }

    /// Schemas advertised to the model
    pub fn schemas(&self) -> Vec<ToolSchema> {
        vec![
            ToolSchema::new(
                DOCUMENT_SEARCH,
                "Fetch passages from the indexed corpus for the given query. \
                 Prefer this for questions about the user-provided documents.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query over the indexed documents"
                        }
                    },
                    "required": ["query"]
                }),
            ),
            ToolSchema::new(
                KNOWLEDGE_LOOKUP,
                "Search an encyclopedia for general knowledge about the given query.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Topic to look up"
                        }
                    },
                    "required": ["query"]
                }),
            ),
        ]
    }

    /// Execute one tool invocation and return its result text
    pub async fn execute(&self, call: &ToolCall) -> Result<String> {
        let args: QueryArgs = match serde_json::from_str(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                return Ok(format!(
                    "Invalid arguments for {}: {}. Expected {{\"query\": \"...\"}}.",
                    call.name, e
                ))
            }
        };

        match call.name.as_str() {
            DOCUMENT_SEARCH => self.document_search(&args.query).await,
            KNOWLEDGE_LOOKUP => self.knowledge.lookup(&args.query).await,
            other => Ok(format!("Unknown tool: {}", other)),
        }
    }

    /// Retrieve and format corpus passages as numbered blocks
    async fn document_search(&self, query: &str) -> Result<String> {
        let results = self.index.retrieve(query, DOCUMENT_SEARCH_TOP_K).await?;

        if results.is_empty() {
            return Ok(NO_DOCUMENTS.to_string());
        }

        let blocks: Vec<String> = results
            .iter()
            .enumerate()
            .map(|(i, scored)| {
                format!(
                    "[{}] {}\n{}",
                    i + 1,
                    scored.chunk.metadata.label(),
                    scored.chunk.text
                )
            })
            .collect();

        Ok(blocks.join("\n\n"))
    }
}
