//! The judge oracle.
//!
//! Every category is graded by an [`LLMProvider`] able to return structured
//! (JSON) output. Concrete vendor clients live outside this crate; anything
//! implementing the trait can act as the judge.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{FlowgradeError, Result};
use crate::parsing::JudgePayloadParser;

pub mod scripted;

pub use scripted::{ScriptedProvider, ScriptedResponse};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider
#[derive(Debug, Clone, PartialEq)]
pub struct LLMRequest {
    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
}

impl LLMRequest {
    /// Create a simple request from a single prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create a request with system prompt
    pub fn with_system_prompt(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature: None,
            max_tokens: None,
        }
    }

    /// Apply generation parameters
    pub fn with_params(mut self, temperature: f32, max_tokens: usize) -> Self {
        self.temperature = Some(temperature);
        self.max_tokens = Some(max_tokens);
        self
    }

    /// All message contents joined by newlines
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,
}

/// Trait for judge implementations.
///
/// Implementors handle the actual model calls (OpenAI, Claude, a local
/// model, a recorded fixture). Retries, timeouts and cancellation belong to
/// the implementation; the engine issues each call exactly once.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate text from a structured request.
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse>;

    /// Generate structured output (JSON) conforming to `schema`.
    ///
    /// The default implementation asks for plain text and recovers the JSON
    /// object from it. Providers with a native JSON mode should override it
    /// and pass the schema through.
    async fn generate_structured(
        &self,
        request: &LLMRequest,
        _schema: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let response = self.generate_request(request).await?;
        JudgePayloadParser::new()
            .parse(&response.content)
            .map_err(|e| FlowgradeError::oracle_output("structured_output", e.to_string()))
    }

    /// Whether this provider can honour [`generate_structured`].
    ///
    /// Checked once when a category chain is bound.
    ///
    /// [`generate_structured`]: LLMProvider::generate_structured
    fn supports_structured_output(&self) -> bool {
        true
    }

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

/// Placeholder provider used when no judge has been configured.
///
/// Reports no structured-output support so binding fails fast.
pub struct StubLLMProvider;

#[async_trait]
impl LLMProvider for StubLLMProvider {
    async fn generate_request(&self, _request: &LLMRequest) -> Result<LLMResponse> {
        Err(FlowgradeError::Configuration(
            "LLM provider not configured. Implement the LLMProvider trait for your judge"
                .to_string(),
        ))
    }

    fn supports_structured_output(&self) -> bool {
        false
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "stub".to_string(),
            model_name: "none".to_string(),
        }
    }
}
