//! Chat model types and client
//!
//! Defines the provider-agnostic conversation types exchanged with the
//! language model, the [`ChatModel`] trait seam, and the Groq-backed
//! implementation in [`client`].

pub mod client;

pub use client::GroqClient;

use crate::errors::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Speaker role within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One conversation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: Option<String>,
    /// Tool invocations requested by an assistant message
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Set on tool-result messages to link back to the request
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: None,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A tool invocation emitted by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

/// Schema advertised to the model for one callable capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema for the argument object
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// What the model produced for one round-trip
#[derive(Debug, Clone)]
pub enum ChatOutcome {
    /// A final text message
    Text(String),
    /// One or more tool invocations to execute
    ToolCalls(Vec<ToolCall>),
}

/// Seam over the chat completion provider
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// One model round-trip over the conversation so far.
    ///
    /// An empty `tools` slice forces a plain text response.
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<ChatOutcome>;
}
