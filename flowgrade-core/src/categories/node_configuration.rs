//! Node parameter configuration

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{CategoryResult, EvaluationInput};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on NODE CONFIGURATION.
Judge whether node parameters are set so each node performs the operation the user needs.

## Credentials
Credentials are attached at run time through the n8n UI. Empty `credentials` objects are normal; never deduct for them.

## Acceptable placeholders
- `<UNKNOWN>` values
- Empty strings
- Empty resource selectors
- Placeholder keys such as "YOUR_API_KEY"

## Tool nodes
`$fromAI` expressions are valid in any tool node parameter.

## Violations
**Critical (-30 to -40 points)**: values the user provided are implemented incorrectly, required parameters are missing entirely, configurations that crash at run time.
**Major (-10 to -20 points)**: wrong operation mode, missing resource or operation selection.
**Minor (-2 to -5 points)**: configurations that work but are not the best fit.

## Scoring
Start at 100, subtract each violation and report the result on a 0-1 scale."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the node configuration of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide a node configuration evaluation with score, violations, and brief analysis."#;

/// Grades node parameters
#[derive(Debug)]
pub struct NodeConfigurationEvaluator {
    chain: EvaluatorChain<CategoryResult>,
}

impl NodeConfigurationEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::NodeConfiguration,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for NodeConfigurationEvaluator {
    type Output = CategoryResult;

    fn category(&self) -> Category {
        Category::NodeConfiguration
    }

    async fn evaluate(&self, input: &EvaluationInput) -> Result<CategoryResult> {
        self.chain.invoke(&PromptVariables::from_input(input)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;
    use serde_json::json;

    #[tokio::test]
    async fn test_judge_output_passes_through() {
        let provider = Arc::new(ScriptedProvider::new().respond_when(
            Category::NodeConfiguration.focus(),
            json!({
                "score": 0.4,
                "violations": [
                    {"type": "critical", "description": "Slack channel is empty", "pointsDeducted": 40},
                    {"type": "minor", "description": "Default timeout", "pointsDeducted": 5}
                ]
            }),
        ));
        let evaluator =
            NodeConfigurationEvaluator::bind(provider.clone(), &JudgeConfig::default()).unwrap();

        let result = evaluator
            .evaluate(&EvaluationInput::new("Post to #ops", json!({"nodes": []})))
            .await
            .unwrap();

        assert_eq!(evaluator.category(), Category::NodeConfiguration);
        assert_eq!(result.score, 0.4);
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.critical_violations().count(), 1);
        assert_eq!(result.analysis, None);
        assert_eq!(provider.call_count(), 1);
    }
}
