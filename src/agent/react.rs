//! Bounded tool-calling agent loop
//!
//! Drives the phase machine in [`super::state`]: the model reads the
//! conversation and either requests tools or emits the final answer.
//! A hard cap on tool calls guarantees termination; an exhausted loop
//! gets one tool-free round-trip before falling back to a sentinel
//! answer rather than raising.

use crate::agent::state::{AgentPhase, PhaseEvent};
use crate::agent::tools::AgentToolkit;
use crate::errors::{RagError, Result};
use crate::llm::{ChatMessage, ChatModel, ChatOutcome, ToolSchema};
use std::sync::Arc;
use std::time::Instant;

/// Returned when the loop never produces a textual answer
pub const FALLBACK_ANSWER: &str = "Could not generate answer.";

/// Guidance sent as the system message on every run
const SYSTEM_PROMPT: &str = "You are a helpful RAG agent. \
    Prefer 'document_search' for user-provided documents; \
    use 'knowledge_lookup' for general knowledge. \
    Return only the final useful answer.";

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Hard cap on tool executions per question
    pub max_tool_calls: usize,

    /// Enable diagnostic output
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_calls: 10,
            verbose: false,
        }
    }
}

/// One executed tool call, recorded for observability
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    pub tool: String,
    pub arguments: String,
    pub output: String,
    pub duration_ms: u64,
}

/// Final output of one agent run
#[derive(Debug, Clone)]
pub struct AgentAnswer {
    /// The model's final text, or [`FALLBACK_ANSWER`]
    pub answer: String,

    /// Every tool invocation in execution order
    pub tool_trace: Vec<ToolInvocation>,

    /// Number of model round-trips
    pub iterations: usize,
}

pub struct ReactAgent {
    model: Arc<dyn ChatModel>,
    toolkit: AgentToolkit,
    config: AgentConfig,
    /// Tool schemas, cached by `build()`
    schemas: Option<Vec<ToolSchema>>,
}

impl ReactAgent {
    pub fn new(model: Arc<dyn ChatModel>, toolkit: AgentToolkit, config: AgentConfig) -> Self {
        Self {
            model,
            toolkit,
            config,
            schemas: None,
        }
    }

    /// Prepare the agent for queries. Idempotent; safe to call repeatedly.
    pub fn build(&mut self) -> Result<()> {
        if self.schemas.is_none() {
            self.schemas = Some(self.toolkit.schemas());
        }
        Ok(())
    }

    /// Whether `build()` has completed
    pub fn is_built(&self) -> bool {
        self.schemas.is_some()
    }

    /// Answer a question through the bounded tool-calling loop
    pub async fn run(&self, question: &str) -> Result<AgentAnswer> {
        let schemas = self.schemas.as_ref().ok_or(RagError::NotInitialized)?;

        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(question),
        ];

        let mut phase = AgentPhase::Start.transition(PhaseEvent::QuestionReceived)?;
        let mut trace: Vec<ToolInvocation> = Vec::new();
        let mut tool_calls_used = 0;
        let mut iterations = 0;

        loop {
            iterations += 1;

            if tool_calls_used >= self.config.max_tool_calls {
                if self.config.verbose {
                    eprintln!(
                        "[AGENT] tool budget exhausted after {} calls, forcing text answer",
                        tool_calls_used
                    );
                }
                // One tool-free round-trip before giving up
                let answer = match self.model.chat(&messages, &[]).await? {
                    ChatOutcome::Text(text) if !text.trim().is_empty() => text,
                    _ => FALLBACK_ANSWER.to_string(),
                };
                phase.transition(PhaseEvent::AnswerEmitted)?;
                return Ok(AgentAnswer {
                    answer,
                    tool_trace: trace,
                    iterations,
                });
            }

            match self.model.chat(&messages, schemas).await? {
                ChatOutcome::Text(text) => {
                    phase.transition(PhaseEvent::AnswerEmitted)?;
                    let answer = if text.trim().is_empty() {
                        FALLBACK_ANSWER.to_string()
                    } else {
                        text
                    };
                    return Ok(AgentAnswer {
                        answer,
                        tool_trace: trace,
                        iterations,
                    });
                }
                ChatOutcome::ToolCalls(calls) => {
                    phase = phase.transition(PhaseEvent::ToolsRequested)?;
                    messages.push(ChatMessage::assistant_tool_calls(calls.clone()));

                    for call in &calls {
                        let started = Instant::now();
                        let output = self.toolkit.execute(call).await?;
                        let duration_ms = started.elapsed().as_millis() as u64;

                        if self.config.verbose {
                            eprintln!(
                                "[AGENT] {} ({} ms): {} chars",
                                call.name,
                                duration_ms,
                                output.len()
                            );
                        }

                        messages.push(ChatMessage::tool_result(&call.id, &output));
                        trace.push(ToolInvocation {
                            tool: call.name.clone(),
                            arguments: call.arguments.clone(),
                            output,
                            duration_ms,
                        });
                        tool_calls_used += 1;
                    }

                    phase = phase.transition(PhaseEvent::ToolsCompleted)?;
                }
            }
        }
    }
}
