//! Rubric-to-oracle binding shared by every category judge

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, LazyLock};

use super::Category;
use crate::config::JudgeConfig;
use crate::error::{FlowgradeError, Result};
use crate::llm::{LLMProvider, LLMRequest};
use crate::types::EvaluationInput;
use crate::validation::{JudgeOutput, parse_judge_output};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("valid placeholder regex")
});

/// Values interpolated into a human-turn template
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromptVariables {
    values: BTreeMap<&'static str, String>,
}

impl PromptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// `userPrompt`, `generatedWorkflow` and `referenceSection` for `input`
    pub fn from_input(input: &EvaluationInput) -> Self {
        Self::new()
            .with("userPrompt", input.user_prompt.clone())
            .with("generatedWorkflow", input.generated_workflow.render())
            .with("referenceSection", input.reference_section())
    }

    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Substituted text is never rescanned, so braces inside a workflow
/// document stay as they are. Unknown placeholders are left untouched.
pub fn render_template(template: &str, variables: &PromptVariables) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// A rubric and template bound to a structured-output judge.
///
/// Produces `T` for every invocation or an error tagged with the category.
pub struct EvaluatorChain<T: JudgeOutput> {
    provider: Arc<dyn LLMProvider>,
    category: Category,
    system_prompt: &'static str,
    template: &'static str,
    judge: JudgeConfig,
    _output: PhantomData<fn() -> T>,
}

impl<T: JudgeOutput> std::fmt::Debug for EvaluatorChain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorChain")
            .field("category", &self.category)
            .field("model", &self.provider.model_info().model_name)
            .field("judge", &self.judge)
            .finish()
    }
}

impl<T: JudgeOutput> EvaluatorChain<T> {
    /// Bind a rubric to `provider`.
    ///
    /// Fails with [`FlowgradeError::Configuration`] when the provider cannot
    /// return structured output.
    pub fn bind(
        provider: Arc<dyn LLMProvider>,
        category: Category,
        system_prompt: &'static str,
        template: &'static str,
        judge: &JudgeConfig,
    ) -> Result<Self> {
        if !provider.supports_structured_output() {
            let info = provider.model_info();
            return Err(FlowgradeError::Configuration(format!(
                "judge {}/{} does not support structured output required by '{}'",
                info.provider, info.model_name, category
            )));
        }

        Ok(Self {
            provider,
            category,
            system_prompt,
            template,
            judge: judge.clone(),
            _output: PhantomData,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The request sent to the judge for `variables`
    pub fn request(&self, variables: &PromptVariables) -> LLMRequest {
        LLMRequest::with_system_prompt(self.system_prompt, render_template(self.template, variables))
            .with_params(self.judge.temperature, self.judge.max_tokens)
    }

    /// Call the judge once and validate its answer
    pub async fn invoke(&self, variables: &PromptVariables) -> Result<T> {
        let request = self.request(variables);
        let value = self
            .provider
            .generate_structured(&request, Some(T::json_schema()))
            .await
            .map_err(|err| match err {
                FlowgradeError::OracleOutput { reason, .. } => {
                    FlowgradeError::oracle_output(self.category.name(), reason)
                }
                other => other,
            })?;

        parse_judge_output(self.category, value)
    }
}
