//! Overall score aggregation

use crate::categories::Category;
use crate::types::EvaluationResult;

/// Reduces per-category scores to one overall score.
///
/// The eight named categories are always included; structural similarity is
/// included only when applicable. Weights of included categories are
/// renormalized, so an excluded category shifts its share onto the others
/// instead of lowering the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Categories contributing to the score of `result`
    pub fn included(&self, result: &EvaluationResult) -> Vec<Category> {
        let mut included = Category::NAMED.to_vec();
        if result.structural_similarity.applicable {
            included.push(Category::StructuralSimilarity);
        }
        included
    }

    /// Weighted mean of the included category scores; 0 when nothing is
    /// included
    pub fn aggregate(&self, result: &EvaluationResult) -> f64 {
        let (weighted_sum, total_weight) = self
            .included(result)
            .into_iter()
            .map(|category| (category.weight(), result.category(category).score))
            .fold((0.0, 0.0), |(sum, total), (weight, score)| {
                (sum + weight * score, total + weight)
            });

        if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        }
    }
}
