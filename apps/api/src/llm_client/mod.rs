//! LLM Client: the single point of entry for all model calls in the talent API.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! Services depend on the `LanguageModel` trait and go through `call_json` /
//! `call_json_with_tools`, so tests can swap in a scripted model.
//!
//! Model: claude-sonnet-4-5 (hardcoded, not configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod tools;

#[cfg(test)]
pub mod testing;

use tools::{CapabilitySet, ToolCall, ToolSpec};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Model did not produce a final answer within {rounds} tool rounds")]
    ToolRoundsExceeded { rounds: u32 },
}

impl LlmError {
    /// True when the service itself could not be reached or refused the call,
    /// as opposed to answering with something we could not use.
    pub fn is_upstream(&self) -> bool {
        matches!(self, LlmError::Http(_) | LlmError::Api { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (Anthropic Messages API)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single block of message content. Mirrors the Messages API block types,
/// including the tool-use handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
    /// Block types we neither send nor interpret (thinking, images, ...).
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }
}

/// Everything needed for one round-trip to the model.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolSpec],
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    StopSequence,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<StopReason>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|b| match b {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Tool invocations requested by the model in this turn, in order.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => Some(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Model seam
// ────────────────────────────────────────────────────────────────────────────

/// One request/response exchange with a hosted language model.
///
/// Carried in `AppState` as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn send(&self, request: &ModelRequest) -> Result<LlmResponse, LlmError>;
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Self::with_base_url(api_key, timeout, ANTHROPIC_API_URL)
    }

    pub fn with_base_url(
        api_key: String,
        timeout: Duration,
        api_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    /// Makes a single call to the Messages API. Failures surface immediately;
    /// re-invocation is the caller's decision.
    async fn send(&self, request: &ModelRequest) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system: &request.system,
            messages: &request.messages,
            tools: &request.tools,
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}, stop_reason={:?}",
            llm_response.usage.input_tokens,
            llm_response.usage.output_tokens,
            llm_response.stop_reason
        );

        Ok(llm_response)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured-output helpers
// ────────────────────────────────────────────────────────────────────────────

/// Calls the model once and deserializes the text response as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    prompt: &str,
    system: &str,
) -> Result<T, LlmError> {
    let request = ModelRequest {
        system: system.to_string(),
        messages: vec![Message::user_text(prompt)],
        tools: Vec::new(),
    };
    let response = llm.send(&request).await?;
    parse_json_response(&response)
}

/// Tool-augmented variant of `call_json`: the registered capabilities are
/// offered to the model, which may invoke them any number of times before its
/// final answer. Each round that requests tools is answered with the tool
/// results; at most `max_rounds` model turns are made. Tool requests in the
/// final turn are not executed.
pub async fn call_json_with_tools<T: DeserializeOwned>(
    llm: &dyn LanguageModel,
    prompt: &str,
    system: &str,
    capabilities: &CapabilitySet,
    max_rounds: u32,
) -> Result<T, LlmError> {
    let mut request = ModelRequest {
        system: system.to_string(),
        messages: vec![Message::user_text(prompt)],
        tools: capabilities.specs(),
    };

    for round in 1..=max_rounds {
        let response = llm.send(&request).await?;
        let calls = response.tool_calls();
        if calls.is_empty() {
            return parse_json_response(&response);
        }
        if round == max_rounds {
            warn!(
                "Model still requested {} tool call(s) after {max_rounds} rounds",
                calls.len()
            );
            break;
        }

        debug!(
            "Model requested {} tool call(s) in round {}/{}",
            calls.len(),
            round,
            max_rounds
        );

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            results.push(capabilities.invoke(call).await);
        }

        request.messages.push(Message {
            role: Role::Assistant,
            content: response
                .content
                .into_iter()
                .filter(|b| !matches!(b, ContentBlock::Unsupported))
                .collect(),
        });
        request.messages.push(Message {
            role: Role::User,
            content: results,
        });
    }

    Err(LlmError::ToolRoundsExceeded { rounds: max_rounds })
}

fn parse_json_response<T: DeserializeOwned>(response: &LlmResponse) -> Result<T, LlmError> {
    let text = response.text().ok_or(LlmError::EmptyContent)?;

    // Strip markdown code fences if the model wraps JSON in them
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
