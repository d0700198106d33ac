//! Data flow and transformation accuracy

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{CategoryResult, EvaluationInput};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on DATA FLOW and TRANSFORMATION ACCURACY.
Judge whether data moves between nodes intact and is transformed the way the user needs.

## n8n patterns that are not data loss
- Agents with tools move data internally; it does not appear on the main path
- Vector stores are referenced by id rather than wired directly
- Memory attaches through ai_memory
- Document loaders may receive data over AI links
Deduct for real corruption or loss, not for architecture.

## What to check
- JSON handling: nested field extraction, array map/filter/reduce, merging sources
- Type conversions: strings to numbers, date parsing and formatting, booleans, arrays and objects
- Aggregation: combining node outputs, Merge node usage, one-to-many relationships
- Filtering: IF and Switch conditions, Filter nodes, conditional routing

## Score bands
- 0.9-1.0: integrity preserved, mappings complete, types handled, nested data correct
- 0.7-0.89: mostly correct, cosmetic naming differences or mild inefficiency
- 0.5-0.69: core transformations work but some fields are lost or mis-mapped
- 0.3-0.49: significant mapping errors or structural problems
- 0.0-0.29: critical loss or transformations that make the workflow fail

## Violations
**Critical (-30 to -40 points)**: complete data loss, types that break downstream nodes, required fields missing downstream, circular references. Agent tool usage is never a violation.
**Major (-15 to -25 points)**: partial data loss, mappings that change behaviour, wrong assumptions about structure, missing validation.
**Minor (-5 to -10 points)**: inefficient transformations, unnecessary duplication.

Report the final score on a 0-1 scale."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the data flow and transformations of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide a data flow evaluation with score, violations, and brief analysis."#;

/// Grades data movement and transformation
#[derive(Debug)]
pub struct DataFlowEvaluator {
    chain: EvaluatorChain<CategoryResult>,
}

impl DataFlowEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::DataFlow,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for DataFlowEvaluator {
    type Output = CategoryResult;

    fn category(&self) -> Category {
        Category::DataFlow
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
            Category::DataFlow.focus(),
            json!({
                "score": 0.7,
                "violations": [{"type": "major", "description": "Merge drops ticket ids", "pointsDeducted": 25}],
                "analysis": "Fields mostly mapped"
            }),
        ));
        let evaluator = DataFlowEvaluator::bind(provider.clone(), &JudgeConfig::default()).unwrap();

        let input = EvaluationInput::new("Merge tickets and comments", json!({"nodes": []}))
            .with_reference(json!({"nodes": [{"name": "Join comments"}]}));
        let result = evaluator.evaluate(&input).await.unwrap();

        assert_eq!(result.score, 0.7);
        assert_eq!(result.violations[0].description, "Merge drops ticket ids");
        assert_eq!(result.critical_violations().count(), 0);
        assert_eq!(provider.calls_matching("<reference_workflow>").await, 1);
        assert_eq!(provider.calls_matching("Join comments").await, 1);
    }
}
