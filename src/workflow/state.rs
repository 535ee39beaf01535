//! Per-query workflow state
//!
//! A transient record threaded through the two pipeline stages by value.
//! `retrieved_docs` is set only by the retrieve stage and `answer` only
//! by the respond stage; the state is discarded after the answer is
//! returned to the caller.

use crate::agent::ToolInvocation;
use crate::index::ScoredChunk;

#[derive(Debug, Clone)]
pub struct RagState {
    /// The user question, set at creation and never changed
    pub question: String,

    /// Candidate chunks from the retrieve stage
    pub retrieved_docs: Option<Vec<ScoredChunk>>,

    /// Final answer from the respond stage
    pub answer: Option<String>,

    /// Tool calls made by the agent during the respond stage
    pub tool_trace: Vec<ToolInvocation>,
}

impl RagState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            retrieved_docs: None,
            answer: None,
            tool_trace: Vec::new(),
        }
    }

    /// Produce the post-retrieve state
    pub fn with_retrieved(self, docs: Vec<ScoredChunk>) -> Self {
        Self {
            retrieved_docs: Some(docs),
            ..self
        }
    }

    /// Produce the post-respond (terminal) state
    pub fn with_answer(self, answer: String, tool_trace: Vec<ToolInvocation>) -> Self {
        Self {
            answer: Some(answer),
            tool_trace,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_has_no_results() {
        let state = RagState::new("What is an agent?");
        assert_eq!(state.question, "What is an agent?");
        assert!(state.retrieved_docs.is_none());
        assert!(state.answer.is_none());
        assert!(state.tool_trace.is_empty());
    }

    #[test]
    fn test_stage_updates_preserve_question() {
        let state = RagState::new("What is an agent?")
            .with_retrieved(Vec::new())
            .with_answer("An agent uses tools.".to_string(), Vec::new());

        assert_eq!(state.question, "What is an agent?");
        assert!(matches!(state.retrieved_docs.as_deref(), Some([])));
        assert_eq!(state.answer.as_deref(), Some("An agent uses tools."));
    }
}
