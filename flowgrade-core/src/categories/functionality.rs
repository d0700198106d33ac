//! Functional correctness: does the workflow do what was asked?

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{CategoryResult, EvaluationInput};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on FUNCTIONAL CORRECTNESS.
Judge whether the generated workflow implements what the user explicitly asked for.

## Scope
Grade only functional behaviour: does the workflow reach the requested goal and perform the requested operations in a sensible order.

## Do not deduct for
- Optimisations or extras the user never requested
- A different but valid way of solving the same problem
- Style preferences or small inefficiencies

## Violations

**Critical (-40 to -50 points)**
- A core operation the user asked for is missing
- Logic errors that keep the workflow from working at all
- No trigger although the workflow has to start on a schedule or external event
- The main request is not addressed

**Major (-15 to -25 points)**
- An explicitly required transformation is missing
- A requested feature is only partially implemented
- A clearly wrong node type for the job (for example Set where IF is needed)
- Structural problems that make the first execution fail
- A clearly specified step is left out

**Minor (-5 to -10 points)**
- An optional feature the user mentioned is missing
- A less suitable node choice that still works
- Small deviations that do not break the behaviour

## Scoring
Start from 100 points, subtract each violation, never go below 0 and report the result divided by 100.
Check every scenario the prompt mentions and whether operations run in the right sequence."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the functional correctness of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide a functionality evaluation with score, violations, and brief analysis."#;

/// Grades functional correctness
#[derive(Debug)]
pub struct FunctionalityEvaluator {
    chain: EvaluatorChain<CategoryResult>,
}

impl FunctionalityEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::Functionality,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for FunctionalityEvaluator {
    type Output = CategoryResult;

    fn category(&self) -> Category {
        Category::Functionality
    }

    async fn evaluate(&self, input: &EvaluationInput) -> Result<CategoryResult> {
        self.chain.invoke(&PromptVariables::from_input(input)).await
    }
}
