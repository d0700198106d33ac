//! Schema validation of judge output.
//!
//! A judge's JSON is first deserialized into the category's result type and
//! then range-checked. Either failure becomes an
//! [`FlowgradeError::OracleOutput`] tagged with the category, which the
//! orchestrator can isolate.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::categories::Category;
use crate::error::{FlowgradeError, Result};
use crate::types::{
    BestPracticesResult, CategoryResult, EfficiencyResult, MaintainabilityResult, Severity,
    StructuralSimilarityResult, Violation,
};

/// A result shape a judge can be asked to produce
pub trait JudgeOutput: DeserializeOwned + Send + 'static {
    /// JSON schema passed to the judge with every request
    fn json_schema() -> Value;

    /// Invariants serde cannot express (ranges, allowed severities)
    fn validate(&self) -> std::result::Result<(), String>;
}

/// Deserialize and validate a judge payload for `category`
pub fn parse_judge_output<T: JudgeOutput>(category: Category, value: Value) -> Result<T> {
    let parsed: T = serde_json::from_value(value)
        .map_err(|e| FlowgradeError::oracle_output(category.name(), e.to_string()))?;
    parsed
        .validate()
        .map_err(|reason| FlowgradeError::oracle_output(category.name(), reason))?;
    Ok(parsed)
}

/// Range-check the result of a structural comparator.
///
/// Comparators are not judges, but an applicable result feeds the overall
/// score and must obey the same bounds. Inapplicable results are never
/// scored and pass unchecked.
pub fn check_structural_similarity(
    result: StructuralSimilarityResult,
) -> Result<StructuralSimilarityResult> {
    if result.applicable {
        check_base(&result.base, &ALL_SEVERITIES).map_err(|reason| {
            FlowgradeError::oracle_output(Category::StructuralSimilarity.name(), reason)
        })?;
    }
    Ok(result)
}

fn check_unit(field: &str, value: f64) -> std::result::Result<(), String> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be within [0, 1], got {}", field, value))
    }
}

fn check_violations(
    violations: &[Violation],
    allowed: &[Severity],
) -> std::result::Result<(), String> {
    for (i, violation) in violations.iter().enumerate() {
        if !allowed.contains(&violation.severity) {
            return Err(format!(
                "violations[{}] has disallowed severity '{}'",
                i, violation.severity
            ));
        }
        if !violation.points_deducted.is_finite() || violation.points_deducted < 0.0 {
            return Err(format!(
                "violations[{}].pointsDeducted must be >= 0, got {}",
                i, violation.points_deducted
            ));
        }
    }
    Ok(())
}

fn check_base(base: &CategoryResult, allowed: &[Severity]) -> std::result::Result<(), String> {
    check_unit("score", base.score)?;
    check_violations(&base.violations, allowed)
}

const ALL_SEVERITIES: [Severity; 3] = [Severity::Critical, Severity::Major, Severity::Minor];
const NON_CRITICAL: [Severity; 2] = [Severity::Major, Severity::Minor];

fn unit_property(description: &str) -> Value {
    json!({
        "type": "number",
        "minimum": 0,
        "maximum": 1,
        "description": description
    })
}

fn category_schema(
    severities: &[Severity],
    analysis: &str,
    extra: &[(&str, Value)],
    extra_required: &[&str],
) -> Value {
    let severity_names: Vec<&str> = severities.iter().map(|s| s.as_str()).collect();

    let mut properties = serde_json::Map::new();
    properties.insert("score".to_string(), unit_property("Category score (0-1)"));
    properties.insert(
        "violations".to_string(),
        json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "type": {"type": "string", "enum": severity_names},
                    "description": {"type": "string"},
                    "pointsDeducted": {"type": "number", "minimum": 0}
                },
                "required": ["type", "description", "pointsDeducted"]
            }
        }),
    );
    properties.insert(
        "analysis".to_string(),
        json!({"type": "string", "description": analysis}),
    );
    for (name, schema) in extra {
        properties.insert(name.to_string(), schema.clone());
    }

    let mut required = vec!["score", "violations"];
    required.extend_from_slice(extra_required);

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

impl JudgeOutput for CategoryResult {
    fn json_schema() -> Value {
        category_schema(&ALL_SEVERITIES, "Brief analysis of the category", &[], &["analysis"])
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_base(self, &ALL_SEVERITIES)
    }
}

impl JudgeOutput for EfficiencyResult {
    fn json_schema() -> Value {
        category_schema(
            &ALL_SEVERITIES,
            "Brief analysis of workflow efficiency",
            &[
                ("redundancyScore", unit_property("Score for avoiding redundant operations")),
                ("pathOptimization", unit_property("Score for optimal execution paths")),
                ("nodeCountEfficiency", unit_property("Score for using minimal nodes")),
            ],
            &["redundancyScore", "pathOptimization", "nodeCountEfficiency", "analysis"],
        )
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_base(&self.base, &ALL_SEVERITIES)?;
        check_unit("redundancyScore", self.redundancy_score)?;
        check_unit("pathOptimization", self.path_optimization)?;
        check_unit("nodeCountEfficiency", self.node_count_efficiency)
    }
}

impl JudgeOutput for MaintainabilityResult {
    fn json_schema() -> Value {
        category_schema(
            &ALL_SEVERITIES,
            "Brief analysis of workflow maintainability",
            &[
                ("nodeNamingQuality", unit_property("Score for descriptive node naming")),
                ("workflowOrganization", unit_property("Score for logical workflow structure")),
                ("modularity", unit_property("Score for reusable and modular components")),
            ],
            &["nodeNamingQuality", "workflowOrganization", "modularity", "analysis"],
        )
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_base(&self.base, &ALL_SEVERITIES)?;
        check_unit("nodeNamingQuality", self.node_naming_quality)?;
        check_unit("workflowOrganization", self.workflow_organization)?;
        check_unit("modularity", self.modularity)
    }
}

impl JudgeOutput for BestPracticesResult {
    fn json_schema() -> Value {
        category_schema(
            &NON_CRITICAL,
            "Brief analysis of best-practice adherence",
            &[(
                "techniques",
                json!({
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Workflow techniques identified for this evaluation"
                }),
            )],
            &[],
        )
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_base(&self.base, &NON_CRITICAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_category_payload() {
        let result: CategoryResult = parse_judge_output(
            Category::Functionality,
            json!({
                "score": 0.6,
                "violations": [{"type": "major", "description": "No error branch", "pointsDeducted": 20}],
                "analysis": "Mostly complete"
            }),
        )
        .unwrap();
        assert_eq!(result.score, 0.6);
        assert_eq!(result.violations.len(), 1);
    }

    #[test]
    fn test_score_out_of_range() {
        let err = parse_judge_output::<CategoryResult>(
            Category::Connections,
            json!({"score": 1.4, "violations": []}),
        )
        .unwrap_err();
        match err {
            FlowgradeError::OracleOutput { category, reason } => {
                assert_eq!(category, "connections");
                assert!(reason.contains("score"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_deduction_rejected() {
        let result = parse_judge_output::<CategoryResult>(
            Category::Expressions,
            json!({
                "score": 0.5,
                "violations": [{"type": "minor", "description": "x", "pointsDeducted": -5}]
            }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let result = parse_judge_output::<EfficiencyResult>(
            Category::Efficiency,
            json!({"score": 0.5, "violations": [], "redundancyScore": 0.5, "pathOptimization": 0.5}),
        );
        assert!(matches!(result, Err(FlowgradeError::OracleOutput { .. })));
    }

    #[test]
    fn test_sub_metric_out_of_range() {
        let result = parse_judge_output::<MaintainabilityResult>(
            Category::Maintainability,
            json!({
                "score": 0.5,
                "violations": [],
                "nodeNamingQuality": 0.5,
                "workflowOrganization": 2.0,
                "modularity": 0.5
            }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_best_practices_rejects_critical() {
        let result = parse_judge_output::<BestPracticesResult>(
            Category::BestPractices,
            json!({
                "score": 0.5,
                "violations": [{"type": "critical", "description": "x", "pointsDeducted": 40}]
            }),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_structural_similarity_range_checked() {
        let err = check_structural_similarity(StructuralSimilarityResult::applicable(
            CategoryResult::new(5.0),
        ))
        .unwrap_err();
        assert!(
            matches!(err, FlowgradeError::OracleOutput { ref category, .. } if category == "structuralSimilarity")
        );

        let ok = check_structural_similarity(StructuralSimilarityResult::applicable(
            CategoryResult::new(0.4),
        ))
        .unwrap();
        assert_eq!(ok.base.score, 0.4);

        let mut inapplicable = StructuralSimilarityResult::inapplicable();
        inapplicable.base.score = f64::NAN;
        assert!(check_structural_similarity(inapplicable).is_ok());
    }

    #[test]
    fn test_best_practices_schema_excludes_critical() {
        let schema = BestPracticesResult::json_schema();
        let severities = &schema["properties"]["violations"]["items"]["properties"]["type"]["enum"];
        assert_eq!(severities, &json!(["major", "minor"]));
    }
}
