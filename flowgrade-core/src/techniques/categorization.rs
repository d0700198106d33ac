//! Prompt categorization: which techniques does a request need?

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::technique::WorkflowTechnique;
use crate::config::JudgeConfig;
use crate::error::{FlowgradeError, Result};
use crate::llm::{LLMProvider, LLMRequest};

/// Techniques identified for a user request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptCategorization {
    /// Technique identifiers in the order the categorizer ranked them
    #[serde(default)]
    pub techniques: Vec<String>,

    /// Confidence (0.0 to 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PromptCategorization {
    pub fn new(techniques: Vec<String>, confidence: Option<f64>) -> Self {
        Self {
            techniques,
            confidence: confidence.filter(|c| c.is_finite()).map(|c| c.clamp(0.0, 1.0)),
        }
    }

    /// Techniques that name a known [`WorkflowTechnique`], deduplicated and
    /// in their original order
    pub fn known_techniques(&self) -> Vec<WorkflowTechnique> {
        let mut known = Vec::new();
        for technique in self.techniques.iter().filter_map(|t| t.parse().ok()) {
            if !known.contains(&technique) {
                known.push(technique);
            }
        }
        known
    }
}

/// Maps a user request to workflow techniques
#[async_trait]
pub trait PromptCategorizer: Send + Sync {
    async fn categorize(&self, user_prompt: &str) -> Result<PromptCategorization>;
}

/// Categorizer backed by the judge
pub struct LLMPromptCategorizer {
    provider: Arc<dyn LLMProvider>,
    judge: JudgeConfig,
}

impl LLMPromptCategorizer {
    pub fn new(provider: Arc<dyn LLMProvider>, judge: JudgeConfig) -> Self {
        Self { provider, judge }
    }

    fn build_prompt(&self, user_prompt: &str) -> String {
        let catalogue = WorkflowTechnique::ALL
            .iter()
            .map(|t| format!("- {}: {}", t.as_str(), t.description()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are an expert workflow architect.

Categorize the following user request:
"{}"

Available techniques:
{}

Return JSON with:
- techniques: array of required techniques, most important first
- confidence: number between 0 and 1"#,
            user_prompt, catalogue
        )
    }

    fn schema() -> serde_json::Value {
        let names: Vec<&str> = WorkflowTechnique::ALL.iter().map(|t| t.as_str()).collect();
        json!({
            "type": "object",
            "properties": {
                "techniques": {"type": "array", "items": {"type": "string", "enum": names}},
                "confidence": {"type": "number", "minimum": 0, "maximum": 1}
            },
            "required": ["techniques"]
        })
    }
}

#[async_trait]
impl PromptCategorizer for LLMPromptCategorizer {
    async fn categorize(&self, user_prompt: &str) -> Result<PromptCategorization> {
        let request = LLMRequest::from_prompt(self.build_prompt(user_prompt))
            .with_params(self.judge.temperature, self.judge.max_tokens);

        let value = self
            .provider
            .generate_structured(&request, Some(Self::schema()))
            .await?;

        let raw: PromptCategorization = serde_json::from_value(value)
            .map_err(|e| FlowgradeError::oracle_output("categorization", e.to_string()))?;
        Ok(PromptCategorization::new(raw.techniques, raw.confidence))
    }
}
