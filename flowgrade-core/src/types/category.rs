//! Per-category result shapes

use serde::{Deserialize, Serialize};

use super::violation::{Severity, Violation};

/// Points deducted by the violation attached to a degraded category
const UNAVAILABLE_DEDUCTION: f64 = 100.0;

fn unavailable(severity: Severity, reason: &str) -> Violation {
    Violation::new(
        severity,
        format!("Evaluation unavailable: {}", reason),
        UNAVAILABLE_DEDUCTION,
    )
}

/// Common view over every category result
pub trait ScoredCategory {
    /// The shared score/violations/analysis part
    fn base(&self) -> &CategoryResult;

    fn score(&self) -> f64 {
        self.base().score
    }

    fn violations(&self) -> &[Violation] {
        &self.base().violations
    }
}

/// Base result produced by every category judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    /// Score in [0, 1]
    pub score: f64,

    /// Violations in the order the judge reported them
    pub violations: Vec<Violation>,

    /// Short free-text analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
}

impl CategoryResult {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            violations: Vec::new(),
            analysis: None,
        }
    }

    pub fn with_violation(mut self, violation: Violation) -> Self {
        self.violations.push(violation);
        self
    }

    pub fn with_analysis(mut self, analysis: impl Into<String>) -> Self {
        self.analysis = Some(analysis.into());
        self
    }

    /// Neutral stand-in for a category whose judge call failed
    pub fn degraded(reason: &str) -> Self {
        Self::new(0.0).with_violation(unavailable(Severity::Critical, reason))
    }

    pub fn critical_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_critical())
    }
}

impl ScoredCategory for CategoryResult {
    fn base(&self) -> &CategoryResult {
        self
    }
}

/// Efficiency result; `score` is always the mean of the three sub-metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyResult {
    #[serde(flatten)]
    pub base: CategoryResult,

    /// Avoidance of redundant operations
    pub redundancy_score: f64,

    /// Optimality of execution paths
    pub path_optimization: f64,

    /// Use of a minimal node count
    pub node_count_efficiency: f64,
}

impl EfficiencyResult {
    /// Overwrite the judge's score with the unweighted sub-metric mean
    pub fn recompute_score(&mut self) {
        self.base.score =
            (self.redundancy_score + self.path_optimization + self.node_count_efficiency) / 3.0;
    }

    pub fn degraded(reason: &str) -> Self {
        Self {
            base: CategoryResult::degraded(reason),
            redundancy_score: 0.0,
            path_optimization: 0.0,
            node_count_efficiency: 0.0,
        }
    }
}

impl ScoredCategory for EfficiencyResult {
    fn base(&self) -> &CategoryResult {
        &self.base
    }
}

/// Maintainability result; `score` is always the mean of the three sub-metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintainabilityResult {
    #[serde(flatten)]
    pub base: CategoryResult,

    pub node_naming_quality: f64,

    pub workflow_organization: f64,

    pub modularity: f64,
}

impl MaintainabilityResult {
    /// Overwrite the judge's score with the unweighted sub-metric mean
    pub fn recompute_score(&mut self) {
        self.base.score =
            (self.node_naming_quality + self.workflow_organization + self.modularity) / 3.0;
    }

    pub fn degraded(reason: &str) -> Self {
        Self {
            base: CategoryResult::degraded(reason),
            node_naming_quality: 0.0,
            workflow_organization: 0.0,
            modularity: 0.0,
        }
    }
}

impl ScoredCategory for MaintainabilityResult {
    fn base(&self) -> &CategoryResult {
        &self.base
    }
}

/// Best-practices result with the techniques whose documentation was used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPracticesResult {
    #[serde(flatten)]
    pub base: CategoryResult,

    #[serde(default)]
    pub techniques: Vec<String>,
}

impl BestPracticesResult {
    /// Degraded best-practices results carry a `major` violation, since the
    /// category never reports `critical` ones.
    pub fn degraded(reason: &str) -> Self {
        Self {
            base: CategoryResult::new(0.0).with_violation(unavailable(Severity::Major, reason)),
            techniques: Vec::new(),
        }
    }
}

impl ScoredCategory for BestPracticesResult {
    fn base(&self) -> &CategoryResult {
        &self.base
    }
}

/// Structural similarity against a reference workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralSimilarityResult {
    #[serde(flatten)]
    pub base: CategoryResult,

    /// Whether the category was evaluated at all
    pub applicable: bool,
}

impl StructuralSimilarityResult {
    /// The not-evaluated value: no violations, score 0, excluded from scoring
    pub fn inapplicable() -> Self {
        Self {
            base: CategoryResult::new(0.0),
            applicable: false,
        }
    }

    pub fn applicable(base: CategoryResult) -> Self {
        Self {
            base,
            applicable: true,
        }
    }

    /// A comparison that could not be used is dropped from scoring
    pub fn degraded(_reason: &str) -> Self {
        Self::inapplicable()
    }
}

impl ScoredCategory for StructuralSimilarityResult {
    fn base(&self) -> &CategoryResult {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_efficiency_score_is_recomputed() {
        let mut result: EfficiencyResult = serde_json::from_value(json!({
            "score": 0.99,
            "violations": [],
            "redundancyScore": 0.9,
            "pathOptimization": 0.6,
            "nodeCountEfficiency": 0.3,
            "analysis": "ok"
        }))
        .unwrap();

        result.recompute_score();
        assert_eq!(result.score(), (0.9 + 0.6 + 0.3) / 3.0);
        assert_eq!(result.base.analysis.as_deref(), Some("ok"));
    }

    #[test]
    fn test_maintainability_score_is_recomputed() {
        let mut result = MaintainabilityResult {
            base: CategoryResult::new(0.1),
            node_naming_quality: 1.0,
            workflow_organization: 0.5,
            modularity: 0.0,
        };
        result.recompute_score();
        assert_eq!(result.score(), 0.5);
    }

    #[test]
    fn test_degraded_shapes() {
        let base = CategoryResult::degraded("judge timed out");
        assert_eq!(base.score, 0.0);
        assert_eq!(base.critical_violations().count(), 1);
        assert_eq!(
            base.violations[0].description,
            "Evaluation unavailable: judge timed out"
        );

        let efficiency = EfficiencyResult::degraded("x");
        assert_eq!(efficiency.score(), 0.0);
        assert_eq!(efficiency.redundancy_score, 0.0);

        let best = BestPracticesResult::degraded("x");
        assert_eq!(best.violations()[0].severity, Severity::Major);
        assert!(best.techniques.is_empty());
    }

    #[test]
    fn test_structural_similarity_wire_shape() {
        let value = serde_json::to_value(StructuralSimilarityResult::inapplicable()).unwrap();
        assert_eq!(
            value,
            json!({"score": 0.0, "violations": [], "applicable": false})
        );
    }
}
