//! Retrieval-augmented agent: phase machine, tools, and the bounded loop

pub mod react;
pub mod state;
pub mod tools;
pub mod wikipedia;

pub use react::{AgentAnswer, AgentConfig, ReactAgent, ToolInvocation, FALLBACK_ANSWER};
pub use state::{AgentPhase, PhaseEvent};
pub use tools::AgentToolkit;
pub use wikipedia::{KnowledgeSource, WikipediaClient};
