//! The aggregate evaluation result

use serde::{Deserialize, Serialize};

use super::category::{
    BestPracticesResult, CategoryResult, EfficiencyResult, MaintainabilityResult, ScoredCategory,
    StructuralSimilarityResult,
};
use crate::categories::Category;

/// One result per category slot plus the derived overall score, summary
/// and critical issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Weighted average across included categories (0-1)
    pub overall_score: f64,

    pub functionality: CategoryResult,
    pub connections: CategoryResult,
    pub expressions: CategoryResult,
    pub node_configuration: CategoryResult,
    pub structural_similarity: StructuralSimilarityResult,
    pub efficiency: EfficiencyResult,
    pub data_flow: CategoryResult,
    pub maintainability: MaintainabilityResult,
    pub best_practices: BestPracticesResult,

    /// Short strengths/weaknesses sentence
    pub summary: String,

    /// `[category] description` for every critical violation; `None` when
    /// there are none
    #[serde(default)]
    pub critical_issues: Option<Vec<String>>,
}

impl EvaluationResult {
    /// Base result for a category slot
    pub fn category(&self, category: Category) -> &CategoryResult {
        match category {
            Category::Functionality => &self.functionality,
            Category::Connections => &self.connections,
            Category::Expressions => &self.expressions,
            Category::NodeConfiguration => &self.node_configuration,
            Category::Efficiency => self.efficiency.base(),
            Category::DataFlow => &self.data_flow,
            Category::Maintainability => self.maintainability.base(),
            Category::BestPractices => self.best_practices.base(),
            Category::StructuralSimilarity => self.structural_similarity.base(),
        }
    }

    /// The eight always-evaluated categories in declared order
    pub fn named_categories(&self) -> impl Iterator<Item = (Category, &CategoryResult)> + '_ {
        Category::NAMED
            .iter()
            .map(move |&category| (category, self.category(category)))
    }

    /// Whether any category reported a critical violation
    pub fn has_critical_issues(&self) -> bool {
        self.critical_issues
            .as_ref()
            .is_some_and(|issues| !issues.is_empty())
    }
}
