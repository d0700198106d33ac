//! Workflow efficiency.
//!
//! The judge reports three sub-metrics; the category score is always
//! recomputed as their mean, whatever top-level score the judge returned.

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{EfficiencyResult, EvaluationInput};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on WORKFLOW EFFICIENCY.
Grade the workflow on three efficiency metrics.

## Context
- An agent with tools next to standalone nodes is not automatically duplication
- Backup or fallback paths are deliberate redundancy
- Some repetition keeps a workflow easier to follow

## Metrics

### redundancyScore (0-1)
Duplicate operations and transformations that serve no purpose.

### pathOptimization (0-1)
Execution order and branching that reach the result without detours.

### nodeCountEfficiency (0-1)
The smallest reasonable set of nodes, without needless intermediates.

## Scoring
1. Score each metric between 0 and 1
2. List violations with severity and points deducted
3. The overall score is the average of the three metrics
4. Give concrete examples in the analysis"#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the efficiency of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide an efficiency evaluation with individual metric scores, overall score, violations, and analysis."#;

/// Grades efficiency from three sub-metrics
#[derive(Debug)]
pub struct EfficiencyEvaluator {
    chain: EvaluatorChain<EfficiencyResult>,
}

impl EfficiencyEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::Efficiency,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for EfficiencyEvaluator {
    type Output = EfficiencyResult;

    fn category(&self) -> Category {
        Category::Efficiency
    }

    async fn evaluate(&self, input: &EvaluationInput) -> Result<EfficiencyResult> {
        let mut result = self.chain.invoke(&PromptVariables::from_input(input)).await?;
        result.recompute_score();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedProvider;
    use crate::types::ScoredCategory;
    use serde_json::json;

    #[tokio::test]
    async fn test_judge_score_is_discarded() {
        let provider = Arc::new(ScriptedProvider::new().respond_when(
            Category::Efficiency.focus(),
            json!({
                "score": 1.0,
                "violations": [],
                "redundancyScore": 0.3,
                "pathOptimization": 0.6,
                "nodeCountEfficiency": 0.9,
                "analysis": "Two HTTP calls fetch the same page"
            }),
        ));
        let evaluator = EfficiencyEvaluator::bind(provider, &JudgeConfig::default()).unwrap();

        let result = evaluator
            .evaluate(&EvaluationInput::new("Scrape a page", json!({})))
            .await
            .unwrap();
        assert_eq!(result.score(), (0.3 + 0.6 + 0.9) / 3.0);
    }
}
