//! Capabilities the model may invoke during a tool-augmented call.
//!
//! Callers build a closed `CapabilitySet` and hand it to
//! `call_json_with_tools`; they never invoke the capabilities themselves on
//! that path.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::ContentBlock;

/// Tool declaration as sent to the Messages API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Failed(String),
}

/// A named callable with a fixed input schema.
#[async_trait]
pub trait Capability: Send + Sync {
    fn spec(&self) -> ToolSpec;

    async fn invoke(&self, input: Value) -> Result<Value, CapabilityError>;
}

#[derive(Default)]
pub struct CapabilitySet {
    capabilities: Vec<Box<dyn Capability>>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, capability: impl Capability + 'static) -> Self {
        self.capabilities.push(Box::new(capability));
        self
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.capabilities.iter().map(|c| c.spec()).collect()
    }

    /// Runs one requested call and packages the outcome as a `tool_result`
    /// block. Failures go back to the model as error results.
    pub async fn invoke(&self, call: &ToolCall) -> ContentBlock {
        let Some(capability) = self
            .capabilities
            .iter()
            .find(|c| c.spec().name == call.name)
        else {
            warn!("Model requested unknown tool '{}'", call.name);
            return tool_result(call, format!("Unknown tool: {}", call.name), true);
        };

        info!("Invoking tool '{}'", call.name);
        match capability.invoke(call.input.clone()).await {
            Ok(Value::String(text)) => tool_result(call, text, false),
            Ok(value) => tool_result(call, value.to_string(), false),
            Err(e) => {
                warn!("Tool '{}' failed: {e}", call.name);
                tool_result(call, e.to_string(), true)
            }
        }
    }
}

fn tool_result(call: &ToolCall, content: String, is_error: bool) -> ContentBlock {
    ContentBlock::ToolResult {
        tool_use_id: call.id.clone(),
        content,
        is_error,
    }
}

/// Reads a required string argument from a tool input object.
pub fn require_str<'a>(input: &'a Value, key: &str) -> Result<&'a str, CapabilityError> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| CapabilityError::InvalidInput(format!("missing string field '{key}'")))
}
