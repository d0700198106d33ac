//! Deterministic judge for offline evaluation
//!
//! [`ScriptedProvider`] answers requests from a fixed script instead of a
//! model, so whole evaluations can be replayed without network access and
//! produce identical results on every run.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use super::{LLMProvider, LLMRequest, LLMResponse, ModelInfo};
use crate::error::{FlowgradeError, Result};
use crate::parsing::JudgePayloadParser;

/// Predetermined reply for a scripted request
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Structured payload, returned as-is by `generate_structured`
    Json(Value),
    /// Raw text, parsed like a real model reply
    Text(String),
    /// Oracle failure with the given message
    Failure(String),
}

#[derive(Debug, Clone)]
struct Rule {
    marker: String,
    response: ScriptedResponse,
}

/// A judge that replays scripted responses.
///
/// Rules are checked in insertion order; the first whose marker occurs in
/// the request transcript (system + user text) answers.
pub struct ScriptedProvider {
    rules: Vec<Rule>,
    fallback: Option<ScriptedResponse>,
    structured: bool,
    call_count: AtomicUsize,
    call_history: RwLock<Vec<LLMRequest>>,
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("rules", &self.rules.len())
            .field("has_fallback", &self.fallback.is_some())
            .field("structured", &self.structured)
            .field("call_count", &self.call_count())
            .finish()
    }
}

impl ScriptedProvider {
    /// Create an empty script
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: None,
            structured: true,
            call_count: AtomicUsize::new(0),
            call_history: RwLock::new(Vec::new()),
        }
    }

    /// Answer requests containing `marker` with a JSON payload
    pub fn respond_when(self, marker: impl Into<String>, value: Value) -> Self {
        self.rule(marker, ScriptedResponse::Json(value))
    }

    /// Answer requests containing `marker` with raw text
    pub fn respond_text_when(self, marker: impl Into<String>, text: impl Into<String>) -> Self {
        self.rule(marker, ScriptedResponse::Text(text.into()))
    }

    /// Fail requests containing `marker`
    pub fn fail_when(self, marker: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(marker, ScriptedResponse::Failure(message.into()))
    }

    /// Reply used when no rule matches
    pub fn with_fallback(mut self, response: ScriptedResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Report no structured-output capability
    pub fn without_structured_output(mut self) -> Self {
        self.structured = false;
        self
    }

    fn rule(mut self, marker: impl Into<String>, response: ScriptedResponse) -> Self {
        self.rules.push(Rule {
            marker: marker.into(),
            response,
        });
        self
    }

    /// Number of requests served (including failures)
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every request received, in arrival order
    pub async fn call_history(&self) -> Vec<LLMRequest> {
        self.call_history.read().await.clone()
    }

    /// Requests whose transcript contains `marker`
    pub async fn calls_matching(&self, marker: &str) -> usize {
        self.call_history
            .read()
            .await
            .iter()
            .filter(|r| r.transcript().contains(marker))
            .count()
    }

    async fn resolve(&self, request: &LLMRequest) -> Result<ScriptedResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.call_history.write().await.push(request.clone());

        let transcript = request.transcript();
        let response = self
            .rules
            .iter()
            .find(|rule| transcript.contains(&rule.marker))
            .map(|rule| rule.response.clone())
            .or_else(|| self.fallback.clone());

        match response {
            Some(ScriptedResponse::Failure(message)) => Err(FlowgradeError::Llm(message)),
            Some(response) => Ok(response),
            None => Err(FlowgradeError::Llm(
                "no scripted response matches the request".to_string(),
            )),
        }
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let content = match self.resolve(request).await? {
            ScriptedResponse::Json(value) => value.to_string(),
            ScriptedResponse::Text(text) => text,
            ScriptedResponse::Failure(message) => return Err(FlowgradeError::Llm(message)),
        };

        Ok(LLMResponse { content })
    }

    async fn generate_structured(
        &self,
        request: &LLMRequest,
        _schema: Option<Value>,
    ) -> Result<Value> {
        match self.resolve(request).await? {
            ScriptedResponse::Json(value) => Ok(value),
            ScriptedResponse::Text(text) => JudgePayloadParser::new()
                .parse(&text)
                .map_err(|e| FlowgradeError::oracle_output("structured_output", e.to_string())),
            ScriptedResponse::Failure(message) => Err(FlowgradeError::Llm(message)),
        }
    }

    fn supports_structured_output(&self) -> bool {
        self.structured
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "scripted".to_string(),
            model_name: "deterministic".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_first_matching_rule_wins() {
        let provider = ScriptedProvider::new()
            .respond_when("DATA FLOW and TRANSFORMATION", json!({"score": 0.2}))
            .respond_when("DATA FLOW", json!({"score": 0.9}));

        let request = LLMRequest::with_system_prompt(
            "focusing on DATA FLOW and TRANSFORMATION ACCURACY",
            "workflow",
        );
        let value = provider.generate_structured(&request, None).await.unwrap();
        assert_eq!(value["score"], 0.2);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_text_response_is_parsed() {
        let provider = ScriptedProvider::new()
            .respond_text_when("grade", "```json\n{\"score\": 0.4}\n```");

        let value = provider
            .generate_structured(&LLMRequest::from_prompt("grade this"), None)
            .await
            .unwrap();
        assert_eq!(value["score"], 0.4);
    }

    #[tokio::test]
    async fn test_failure_and_unmatched() {
        let provider = ScriptedProvider::new().fail_when("boom", "rate limited");

        let err = provider
            .generate_request(&LLMRequest::from_prompt("boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowgradeError::Llm(ref m) if m == "rate limited"));

        let err = provider
            .generate_request(&LLMRequest::from_prompt("other"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowgradeError::Llm(_)));
        assert_eq!(provider.call_history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_fallback_and_capability() {
        let provider = ScriptedProvider::new()
            .with_fallback(ScriptedResponse::Json(json!({"ok": true})))
            .without_structured_output();

        assert!(!provider.supports_structured_output());
        let response = provider
            .generate_request(&LLMRequest::from_prompt("anything"))
            .await
            .unwrap();
        assert_eq!(response.content, r#"{"ok":true}"#);
        assert_eq!(provider.calls_matching("anything").await, 1);
    }
}
