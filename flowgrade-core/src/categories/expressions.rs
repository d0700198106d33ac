//! n8n expression syntax

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{CategoryResult, EvaluationInput};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on EXPRESSION SYNTAX.
Judge whether the expressions in node parameters would evaluate correctly at run time.

## Valid expression forms
- Item of a named node: `={{ $('Node Name').item.json.fieldName }}`
- All items: `={{ $('Node Name').all() }}`
- First or last item: `={{ $('Node Name').first().json.field }}`, `={{ $('Node Name').last().json.field }}`
- Indexed item: `={{ $('Node Name').all()[0].json.fieldName }}`
- Previous node: `={{ $json.fieldName }}` or `={{ $input.item.json.field }}`
- Mixed text: `="Report - {{ $now.format('MMMM d, yyyy') }}"`
- Tool nodes attached through ai_tool may use `={{ $fromAI('name', 'description', 'type', default) }}`
- Plain JavaScript inside the braces (array methods, string and math operations, ternaries) is fine

The leading `=` is required for any parameter containing an expression.

## Do not deduct for
- Alternative syntax that works
- Working but verbose expressions
- String concatenation style

## Violations
**Critical (-30 to -40 points)**: invalid JavaScript, references to nodes or fields that do not exist, `$fromAI` outside tool nodes.
**Major (-10 to -20 points)**: missing `=` prefix, undefined variables, wrong data paths.
**Minor (-2 to -5 points)**: outdated syntax, needlessly inefficient expressions.

## Scoring
Start at 100, subtract each violation and report the result on a 0-1 scale.
Grade execution correctness, not style."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the expression syntax of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide an expressions evaluation with score, violations, and brief analysis."#;

/// Grades expression syntax
#[derive(Debug)]
pub struct ExpressionsEvaluator {
    chain: EvaluatorChain<CategoryResult>,
}

impl ExpressionsEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::Expressions,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for ExpressionsEvaluator {
    type Output = CategoryResult;

    fn category(&self) -> Category {
        Category::Expressions
    }

    async fn evaluate(&self, input: &EvaluationInput) -> Result<CategoryResult> {
        self.chain.invoke(&PromptVariables::from_input(input)).await
    }
}
