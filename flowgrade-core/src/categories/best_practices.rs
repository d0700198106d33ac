//! Best-practices adherence.
//!
//! Unlike the other categories this one makes two judge calls: the user
//! request is first categorized into workflow techniques, and the
//! documentation registered for those techniques becomes part of the rubric
//! input. Documentation problems never fail the category; the judge is then
//! told to fall back on general principles.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::{FlowgradeError, Result};
use crate::llm::LLMProvider;
use crate::techniques::{BestPracticesRegistry, PromptCategorization, PromptCategorizer};
use crate::types::{BestPracticesResult, EvaluationInput};

/// Used when categorization succeeded but no technique has documentation
pub const NO_DOCUMENTATION_FALLBACK: &str = "No specific best practices documentation available for this workflow type. Evaluate based on general n8n workflow principles.";

/// Used when categorization or a documentation lookup failed
pub const UNAVAILABLE_FALLBACK: &str =
    "Unable to load specific best practices. Evaluate based on general n8n workflow principles.";

const SECTION_SEPARATOR: &str = "\n\n---\n\n";

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on BEST PRACTICES ADHERENCE.
Judge whether the generated workflow follows the documented best practices for the kind of workflow it is.

## Scope
Grade only adherence to the documentation you are given: recommended patterns, known pitfalls and correct node usage.

## Stay within the request
- Read the user's request first and only apply practices relevant to it
- A simple request does not need production hardening, rate limiting or elaborate error handling unless the user asked for it
- Do not invent practices that are not in the documentation

## Connectivity
n8n workflows can have several triggers and execution paths. Before calling a component disconnected, check AI memory, tools, vector stores, shared storage and agents.

## Violations
Only `major` and `minor` violations exist in this category.
**Major (-15 to -25 points)**: a documented pattern the request clearly needs is ignored, or a documented pitfall is present.
**Minor (-5 to -10 points)**: a relevant recommendation is only partly followed.

Start at 100, subtract each violation and report the result on a 0-1 scale."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate how well this workflow follows n8n best practices in the context of what the user requested.

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

<best_practices_documentation>
{bestPractices}
</best_practices_documentation>

{referenceSection}

IMPORTANT:
- First analyze what the user actually requested
- Only evaluate best practices relevant to that request
- Do NOT mark missing optional features as critical"#;

/// Documentation selected for one request
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBestPractices {
    /// Text for the `{bestPractices}` placeholder
    pub documentation: String,

    /// Techniques whose documentation was included
    pub techniques: Vec<String>,
}

impl LoadedBestPractices {
    fn fallback(sentence: &str) -> Self {
        Self {
            documentation: sentence.to_string(),
            techniques: Vec::new(),
        }
    }
}

/// Grades best-practices adherence against technique documentation
pub struct BestPracticesEvaluator {
    chain: EvaluatorChain<BestPracticesResult>,
    categorizer: Arc<dyn PromptCategorizer>,
    registry: Arc<BestPracticesRegistry>,
}

impl std::fmt::Debug for BestPracticesEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BestPracticesEvaluator")
            .field("chain", &self.chain)
            .field("registry", &self.registry)
            .finish()
    }
}

impl BestPracticesEvaluator {
    pub fn bind(
        provider: Arc<dyn LLMProvider>,
        judge: &JudgeConfig,
        categorizer: Arc<dyn PromptCategorizer>,
        registry: Arc<BestPracticesRegistry>,
    ) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::BestPractices,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
            categorizer,
            registry,
        })
    }

    /// Categorize `user_prompt` and collect the matching documentation.
    ///
    /// Never fails: categorization and lookup errors select a fallback
    /// sentence with an empty technique list.
    pub async fn load_relevant_best_practices(&self, user_prompt: &str) -> LoadedBestPractices {
        let categorization = match self.categorizer.categorize(user_prompt).await {
            Ok(categorization) => categorization,
            Err(err) => {
                warn!(error = %err, "Prompt categorization failed, using general best practices");
                return LoadedBestPractices::fallback(UNAVAILABLE_FALLBACK);
            }
        };

        debug!(
            techniques = ?categorization.techniques,
            confidence = ?categorization.confidence,
            "Prompt categorized"
        );

        match self.collect_documentation(&categorization) {
            Ok(Some(loaded)) => loaded,
            Ok(None) => {
                warn!(
                    techniques = ?categorization.techniques,
                    "No best practices documentation for categorized techniques"
                );
                LoadedBestPractices::fallback(NO_DOCUMENTATION_FALLBACK)
            }
            Err(err) => {
                warn!(error = %err, "Best practices lookup failed, using general best practices");
                LoadedBestPractices::fallback(UNAVAILABLE_FALLBACK)
            }
        }
    }

    fn collect_documentation(
        &self,
        categorization: &PromptCategorization,
    ) -> Result<Option<LoadedBestPractices>> {
        let mut sections = Vec::new();
        let mut techniques = Vec::new();

        for technique in categorization.known_techniques() {
            let Some(document) = self.registry.get(technique) else {
                continue;
            };
            let text = document
                .documentation()
                .map_err(|e| FlowgradeError::DocumentationLookup(format!("{}: {}", technique, e)))?;

            sections.push(format!("## Best Practices for {}\n\n{}", technique, text));
            techniques.push(technique.as_str().to_string());
        }

        if sections.is_empty() {
            return Ok(None);
        }

        Ok(Some(LoadedBestPractices {
            documentation: sections.join(SECTION_SEPARATOR),
            techniques,
        }))
    }
}

#[async_trait]
impl CategoryEvaluator for BestPracticesEvaluator {
    type Output = BestPracticesResult;

    fn category(&self) -> Category {
        Category::BestPractices
    }

    async fn evaluate(&self, input: &EvaluationInput) -> Result<BestPracticesResult> {
        let loaded = self.load_relevant_best_practices(&input.user_prompt).await;

        let variables =
            PromptVariables::from_input(input).with("bestPractices", loaded.documentation);
        let mut result = self.chain.invoke(&variables).await?;

        // The judge may echo techniques; only the ones actually looked up count.
        result.techniques = loaded.techniques;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;
    use crate::techniques::{BestPracticesDocument, WorkflowTechnique};
    use serde_json::json;

    struct FixedCategorizer(Result<Vec<&'static str>>);

    #[async_trait]
    impl PromptCategorizer for FixedCategorizer {
        async fn categorize(&self, _user_prompt: &str) -> Result<PromptCategorization> {
            match &self.0 {
                Ok(techniques) => Ok(PromptCategorization::new(
                    techniques.iter().map(|t| t.to_string()).collect(),
                    Some(0.9),
                )),
                Err(err) => Err(FlowgradeError::Llm(err.to_string())),
            }
        }
    }

    struct BrokenDocument;

    impl BestPracticesDocument for BrokenDocument {
        fn technique(&self) -> WorkflowTechnique {
            WorkflowTechnique::Triage
        }

        fn version(&self) -> &str {
            "0.0.1"
        }

        fn documentation(&self) -> Result<String> {
            Err(FlowgradeError::Other("file missing".to_string()))
        }
    }

    fn judge() -> Arc<ScriptedProvider> {
        Arc::new(ScriptedProvider::new().respond_when(
            Category::BestPractices.focus(),
            json!({
                "score": 0.7,
                "violations": [{"type": "minor", "description": "No retry on send", "pointsDeducted": 5}],
                "techniques": ["made_up"]
            }),
        ))
    }

    fn evaluator(
        provider: Arc<ScriptedProvider>,
        techniques: Result<Vec<&'static str>>,
        registry: BestPracticesRegistry,
    ) -> BestPracticesEvaluator {
        BestPracticesEvaluator::bind(
            provider,
            &JudgeConfig::default(),
            Arc::new(FixedCategorizer(techniques)),
            Arc::new(registry),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_documentation_sections_joined() {
        let evaluator = evaluator(
            judge(),
            Ok(vec!["scheduling", "triage", "notification"]),
            BestPracticesRegistry::builtin(),
        );

        let loaded = evaluator.load_relevant_best_practices("daily alert").await;
        assert_eq!(loaded.techniques, vec!["scheduling", "notification"]);
        assert!(loaded.documentation.starts_with("## Best Practices for scheduling\n\n"));
        assert_eq!(loaded.documentation.matches(SECTION_SEPARATOR).count(), 1);
        assert!(loaded.documentation.contains("## Best Practices for notification"));
    }

    #[tokio::test]
    async fn test_no_documentation_fallback() {
        let evaluator = evaluator(judge(), Ok(vec!["triage", "unknown"]), BestPracticesRegistry::builtin());

        let loaded = evaluator.load_relevant_best_practices("route tickets").await;
        assert_eq!(loaded.documentation, NO_DOCUMENTATION_FALLBACK);
        assert!(loaded.techniques.is_empty());
    }

    #[tokio::test]
    async fn test_categorization_failure_is_suppressed() {
        let provider = judge();
        let evaluator = evaluator(
            provider.clone(),
            Err(FlowgradeError::Llm("timeout".to_string())),
            BestPracticesRegistry::builtin(),
        );

        let result = evaluator
            .evaluate(&EvaluationInput::new("anything", json!({})))
            .await
            .unwrap();
        assert!(result.techniques.is_empty());

        let history = provider.call_history().await;
        assert!(history[0].messages[1].content.contains(UNAVAILABLE_FALLBACK));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_suppressed() {
        let evaluator = evaluator(
            judge(),
            Ok(vec!["chatbot", "triage"]),
            BestPracticesRegistry::builtin().with_document(BrokenDocument),
        );

        let loaded = evaluator.load_relevant_best_practices("bot").await;
        assert_eq!(loaded.documentation, UNAVAILABLE_FALLBACK);
        assert!(loaded.techniques.is_empty());
    }

    #[tokio::test]
    async fn test_techniques_come_from_lookup_not_judge() {
        let evaluator = evaluator(judge(), Ok(vec!["chatbot"]), BestPracticesRegistry::builtin());

        let result = evaluator
            .evaluate(&EvaluationInput::new("Slack bot", json!({})))
            .await
            .unwrap();
        assert_eq!(result.techniques, vec!["chatbot"]);
        assert_eq!(result.base.score, 0.7);
    }
}
