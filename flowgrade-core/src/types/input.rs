//! Evaluation inputs

use serde::{Deserialize, Serialize};

/// An automation workflow document.
///
/// The engine never inspects the structure; it is only rendered into judge
/// prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowDocument(serde_json::Value);

impl WorkflowDocument {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Pretty-printed JSON for prompt interpolation
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<serde_json::Value> for WorkflowDocument {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Strictness preset. Accepted and carried, but no category reads it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Strict,
    Standard,
    Lenient,
}

/// Everything a category judge needs to grade one generated workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationInput {
    /// The user's original request
    pub user_prompt: String,

    /// The workflow under evaluation
    pub generated_workflow: WorkflowDocument,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_workflow: Option<WorkflowDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_workflows: Option<Vec<WorkflowDocument>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
}

impl EvaluationInput {
    pub fn new(user_prompt: impl Into<String>, generated_workflow: impl Into<WorkflowDocument>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            generated_workflow: generated_workflow.into(),
            reference_workflow: None,
            reference_workflows: None,
            preset: None,
        }
    }

    /// Build the input for a stored test case and the workflow generated for it
    pub fn from_test_case(test_case: &TestCase, generated_workflow: impl Into<WorkflowDocument>) -> Self {
        Self {
            user_prompt: test_case.prompt.clone(),
            generated_workflow: generated_workflow.into(),
            reference_workflow: test_case.reference_workflow.clone(),
            reference_workflows: test_case.reference_workflows.clone(),
            preset: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<WorkflowDocument>) -> Self {
        self.reference_workflow = Some(reference.into());
        self
    }

    pub fn with_references(mut self, references: Vec<WorkflowDocument>) -> Self {
        self.reference_workflows = Some(references);
        self
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Reference documents in rendering order.
    ///
    /// A single `reference_workflow` takes precedence over the list.
    pub fn references(&self) -> Vec<&WorkflowDocument> {
        match (&self.reference_workflow, &self.reference_workflows) {
            (Some(single), _) => vec![single],
            (None, Some(many)) => many.iter().collect(),
            (None, None) => Vec::new(),
        }
    }

    pub fn has_reference(&self) -> bool {
        !self.references().is_empty()
    }

    /// The `{referenceSection}` placeholder value: one wrapped block per
    /// reference, or an empty string when there is none.
    pub fn reference_section(&self) -> String {
        self.references()
            .iter()
            .map(|doc| format!("<reference_workflow>\n{}\n</reference_workflow>", doc.render()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A stored prompt with optional ground-truth workflows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub prompt: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_workflow: Option<WorkflowDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_workflows: Option<Vec<WorkflowDocument>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_section_empty_without_reference() {
        let input = EvaluationInput::new("send a daily email", json!({"nodes": []}));
        assert!(!input.has_reference());
        assert_eq!(input.reference_section(), "");
    }

    #[test]
    fn test_reference_section_wraps_document() {
        let input = EvaluationInput::new("p", json!({})).with_reference(json!({"name": "ref"}));
        let section = input.reference_section();
        assert!(section.starts_with("<reference_workflow>\n"));
        assert!(section.ends_with("\n</reference_workflow>"));
        assert!(section.contains("\"name\": \"ref\""));
    }

    #[test]
    fn test_single_reference_takes_precedence() {
        let input = EvaluationInput::new("p", json!({}))
            .with_reference(json!({"id": 1}))
            .with_references(vec![json!({"id": 2}).into(), json!({"id": 3}).into()]);
        assert_eq!(input.references().len(), 1);

        let input = EvaluationInput::new("p", json!({}))
            .with_references(vec![json!({"id": 2}).into(), json!({"id": 3}).into()]);
        assert_eq!(input.reference_section().matches("<reference_workflow>").count(), 2);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let input: EvaluationInput = serde_json::from_value(json!({
            "userPrompt": "Summarise RSS items",
            "generatedWorkflow": {"nodes": [{"name": "RSS"}]},
            "preset": "strict"
        }))
        .unwrap();
        assert_eq!(input.user_prompt, "Summarise RSS items");
        assert_eq!(input.preset, Some(Preset::Strict));
        assert_eq!(input.generated_workflow.as_value()["nodes"][0]["name"], "RSS");
    }

    #[test]
    fn test_from_test_case() {
        let case = TestCase {
            id: "tc-1".to_string(),
            name: "Slack digest".to_string(),
            prompt: "Post a Slack digest every morning".to_string(),
            reference_workflow: Some(json!({"nodes": []}).into()),
            reference_workflows: None,
        };
        let input = EvaluationInput::from_test_case(&case, json!({"nodes": [1]}));
        assert_eq!(input.user_prompt, case.prompt);
        assert!(input.has_reference());
    }
}
