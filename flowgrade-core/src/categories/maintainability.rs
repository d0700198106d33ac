//! Workflow maintainability; score is the mean of its three sub-metrics

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{EvaluationInput, MaintainabilityResult};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on WORKFLOW MAINTAINABILITY.
Grade how easy the workflow is to read, change and reuse.

## Metrics
1. nodeNamingQuality (0-1): node names describe what each step does
2. workflowOrganization (0-1): steps are laid out in a logical, followable structure
3. modularity (0-1): repeated logic is factored into reusable pieces where it helps

The overall score is the average of the three metrics.
Report violations with severity and points deducted, and keep the analysis short."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the maintainability of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide a maintainability evaluation with naming, organization, and modularity scores, violations, and analysis."#;

#[derive(Debug)]
pub struct MaintainabilityEvaluator {
    chain: EvaluatorChain<MaintainabilityResult>,
}

impl MaintainabilityEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::Maintainability,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for MaintainabilityEvaluator {
    type Output = MaintainabilityResult;

    fn category(&self) -> Category {
        Category::Maintainability
    }

    async fn evaluate(&self, input: &EvaluationInput) -> Result<MaintainabilityResult> {
        let mut result = self.chain.invoke(&PromptVariables::from_input(input)).await?;
        result.recompute_score();
        Ok(result)
    }
}
