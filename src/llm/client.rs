//! Groq chat completions client
//!
//! Speaks the OpenAI-compatible chat completions API with function
//! calling. Non-success responses surface as external-service errors;
//! nothing is retried.

use crate::config::Config;
use crate::errors::{RagError, Result};
use crate::llm::{ChatMessage, ChatModel, ChatOutcome, ChatRole, ToolCall, ToolSchema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Groq OpenAI-compatible endpoint
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Sampling temperature (kept low for grounded answers)
const TEMPERATURE: f32 = 0.2;

/// Chat request timeout
const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CHAT_TIMEOUT)
            .build()
            .map_err(RagError::Http)?;

        Ok(Self {
            client,
            api_key: config.groq_api_key.clone(),
            model: config.llm_model.clone(),
        })
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolSchema]) -> Result<ChatOutcome> {
        let request = WireRequest {
            model: self.model.clone(),
            messages: messages.iter().map(WireMessage::from).collect(),
            temperature: TEMPERATURE,
            tools: if tools.is_empty() {
                None
            } else {
                Some(tools.iter().map(WireTool::from).collect())
            },
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
        };

        let response = self
            .client
            .post(GROQ_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::ExternalService(format!("Chat request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(RagError::ExternalService(format!(
                "Chat service returned HTTP {}: {}",
                status, detail
            )));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| RagError::ExternalService(format!("Failed to parse chat response: {}", e)))?;

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            RagError::ExternalService("Chat service returned no choices".to_string())
        })?;

        if let Some(wire_calls) = choice.message.tool_calls {
            if !wire_calls.is_empty() {
                let calls = wire_calls
                    .into_iter()
                    .map(|tc| ToolCall {
                        id: tc.id,
                        name: tc.function.name,
                        arguments: tc.function.arguments,
                    })
                    .collect();
                return Ok(ChatOutcome::ToolCalls(calls));
            }
        }

        Ok(ChatOutcome::Text(choice.message.content.unwrap_or_default()))
    }
}

// Wire format (OpenAI-compatible)

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        let role = match msg.role {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Tool => "tool",
        };

        Self {
            role,
            content: msg.content.clone(),
            tool_calls: msg
                .tool_calls
                .as_ref()
                .map(|calls| calls.iter().map(WireToolCall::from).collect()),
            tool_call_id: msg.tool_call_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionCall,
}

impl From<&ToolCall> for WireToolCall {
    fn from(tc: &ToolCall) -> Self {
        Self {
            id: tc.id.clone(),
            kind: "function".to_string(),
            function: WireFunctionCall {
                name: tc.name.clone(),
                arguments: tc.arguments.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionDef,
}

impl From<&ToolSchema> for WireTool {
    fn from(schema: &ToolSchema) -> Self {
        Self {
            kind: "function",
            function: WireFunctionDef {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireFunctionDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_configured_model() {
        let config =
            Config::with_credentials("gsk_key".to_string(), "hf_token".to_string()).unwrap();
        let client = GroqClient::new(&config).unwrap();
        assert_eq!(client.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn test_wire_message_roles() {
        let wire = WireMessage::from(&ChatMessage::tool_result("call_1", "output"));
        assert_eq!(wire.role, "tool");
        assert_eq!(wire.tool_call_id.as_deref(), Some("call_1"));

        let wire = WireMessage::from(&ChatMessage::system("guidance"));
        assert_eq!(wire.role, "system");
    }

    #[test]
    fn test_wire_tool_serialization() {
        let schema = ToolSchema::new(
            "document_search",
            "Fetch passages from the indexed corpus",
            serde_json::json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }),
        );
        let wire = WireTool::from(&schema);
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "document_search");
        assert_eq!(json["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_response_parsing_tool_calls() {
        let raw = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": { "name": "document_search", "arguments": "{\"query\":\"agents\"}" }
                    }]
                }
            }]
        }"#;

        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        let calls = parsed.choices[0].message.tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].function.name, "document_search");
    }

    #[test]
    fn test_response_parsing_text() {
        let raw = r#"{ "choices": [{ "message": { "content": "Paris." } }] }"#;
        let parsed: WireResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Paris."));
    }
}
