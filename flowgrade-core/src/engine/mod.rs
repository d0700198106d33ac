//! Evaluation engine
//!
//! [`WorkflowEvaluator`] runs the category judges and then applies three
//! pure passes over the assembled result:
//!
//! - [`ScoreAggregator`] computes the overall score
//! - [`SummaryGenerator`] writes the strengths/weaknesses sentence
//! - [`CriticalIssueExtractor`] lists critical violations
//!
//! Each pass reads only per-category state, never another pass's output.

pub mod aggregator;
pub mod critical;
pub mod orchestrator;
pub mod summary;

pub use aggregator::ScoreAggregator;
pub use critical::CriticalIssueExtractor;
pub use orchestrator::{WorkflowEvaluator, WorkflowEvaluatorBuilder, evaluate};
pub use summary::{STRENGTH_THRESHOLD, SummaryGenerator, WEAKNESS_THRESHOLD};

#[cfg(test)]
pub(crate) mod tests {
    use crate::types::{
        BestPracticesResult, CategoryResult, EfficiencyResult, EvaluationResult,
        MaintainabilityResult, StructuralSimilarityResult,
    };

    /// Result shell with the eight named scores in declared order
    pub(crate) fn result_with_scores(scores: [f64; 8]) -> EvaluationResult {
        let [func, conn, expr, node, eff, flow, maint, best] = scores;
        EvaluationResult {
            overall_score: 0.0,
            functionality: CategoryResult::new(func),
            connections: CategoryResult::new(conn),
            expressions: CategoryResult::new(expr),
            node_configuration: CategoryResult::new(node),
            structural_similarity: StructuralSimilarityResult::inapplicable(),
            efficiency: EfficiencyResult {
                base: CategoryResult::new(eff),
                redundancy_score: eff,
                path_optimization: eff,
                node_count_efficiency: eff,
            },
            data_flow: CategoryResult::new(flow),
            maintainability: MaintainabilityResult {
                base: CategoryResult::new(maint),
                node_naming_quality: maint,
                workflow_organization: maint,
                modularity: maint,
            },
            best_practices: BestPracticesResult {
                base: CategoryResult::new(best),
                techniques: Vec::new(),
            },
            summary: String::new(),
            critical_issues: None,
        }
    }
}
