//! Connection correctness between nodes

use async_trait::async_trait;
use std::sync::Arc;

use super::chain::{EvaluatorChain, PromptVariables};
use super::{Category, CategoryEvaluator};
use crate::config::JudgeConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::types::{CategoryResult, EvaluationInput};

const SYSTEM_PROMPT: &str = r#"You are an expert n8n workflow evaluator focusing specifically on NODE CONNECTIONS.
Judge whether nodes are wired so the workflow can execute and AI capabilities reach the nodes that use them.

## How n8n connects nodes

### Main connections
- Carry run-time items along the `main` path
- Point from the node producing data to the node consuming it
- Keep the primary path intact: trigger, processing, outputs

### AI capability connections (`ai_*`)
- Sub-nodes provide a capability and are always the source of the link
- Point from sub-node to parent node
- Augment the parent; they never replace the main path

### Hybrid nodes
- May sit on both main and ai_* networks; that is expected
- Flag them only when a required link is really missing

### Capability-only sub-nodes
- Document loaders, splitters, embeddings, language models, tools, memory
- Have no main input or output; never deduct for that

### Builder conventions
- Memory and tools may feed several parents
- Separate vector store nodes for insert and retrieve are valid

## Violations
**Critical (-40 to -50 points)**: disconnected trigger or required node, links pointing the wrong way so data never arrives, a broken main path.
**Major (-15 to -25 points)**: a parent missing a required ai_* capability, a branch output that is never consumed when it must be.
**Minor (-5 to -10 points)**: redundant or confusing links that do not change execution.

## Scoring
Start at 100, subtract each violation and report the result on a 0-1 scale.
Concentrate on execution correctness, link direction and AI capability wiring."#;

const HUMAN_TEMPLATE: &str = r#"Evaluate the connections of this workflow:

<user_prompt>
{userPrompt}
</user_prompt>

<generated_workflow>
{generatedWorkflow}
</generated_workflow>

{referenceSection}

Provide a connections evaluation with score, violations, and brief analysis."#;

/// Grades node wiring
#[derive(Debug)]
pub struct ConnectionsEvaluator {
    chain: EvaluatorChain<CategoryResult>,
}

impl ConnectionsEvaluator {
    pub fn bind(provider: Arc<dyn LLMProvider>, judge: &JudgeConfig) -> Result<Self> {
        Ok(Self {
            chain: EvaluatorChain::bind(
                provider,
                Category::Connections,
                SYSTEM_PROMPT,
                HUMAN_TEMPLATE,
                judge,
            )?,
        })
    }
}

#[async_trait]
impl CategoryEvaluator for ConnectionsEvaluator {
    type Output = CategoryResult;

    fn category(&self) -> Category {
        Category::Connections
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
    async fn test_reference_is_rendered_into_prompt() {
        let provider = Arc::new(ScriptedProvider::new().respond_when(
            Category::Connections.focus(),
            json!({"score": 1.0, "violations": [], "analysis": "fine"}),
        ));
        let evaluator = ConnectionsEvaluator::bind(provider.clone(), &JudgeConfig::default()).unwrap();

        let input = EvaluationInput::new("Sync contacts", json!({"nodes": []}))
            .with_reference(json!({"name": "golden"}));
        evaluator.evaluate(&input).await.unwrap();

        let history = provider.call_history().await;
        let user_turn = &history[0].messages[1].content;
        assert!(user_turn.contains("<reference_workflow>"));
        assert!(user_turn.contains("golden"));
    }
}
