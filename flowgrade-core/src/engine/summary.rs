//! Strengths and weaknesses summary

use crate::categories::Category;
use crate::types::EvaluationResult;

/// Scores at or above this are strengths
pub const STRENGTH_THRESHOLD: f64 = 0.8;

/// Scores strictly below this are weaknesses
pub const WEAKNESS_THRESHOLD: f64 = 0.5;

const GENERIC_SUMMARY: &str =
    "The workflow shows adequate implementation across all evaluated metrics.";

/// Order in which categories are mentioned in the summary
const SUMMARY_ORDER: [Category; 8] = [
    Category::Functionality,
    Category::Connections,
    Category::Expressions,
    Category::NodeConfiguration,
    Category::DataFlow,
    Category::Efficiency,
    Category::Maintainability,
    Category::BestPractices,
];

/// Builds a one or two sentence summary from category scores.
///
/// Scores in `[0.5, 0.8)` are mentioned in neither list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryGenerator;

impl SummaryGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, result: &EvaluationResult) -> String {
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        for category in SUMMARY_ORDER {
            let score = result.category(category).score;
            if score >= STRENGTH_THRESHOLD {
                strengths.push(category.strength_label());
            } else if score < WEAKNESS_THRESHOLD {
                weaknesses.push(category.weakness_label());
            }
        }

        if strengths.is_empty() && weaknesses.is_empty() {
            return GENERIC_SUMMARY.to_string();
        }

        let mut summary = String::new();
        if !strengths.is_empty() {
            summary.push_str(&format!(
                "The workflow demonstrates {}.",
                strengths.join(", ")
            ));
        }
        if !weaknesses.is_empty() {
            summary.push_str(&format!(
                " Key areas for improvement include {}.",
                weaknesses.join(", ")
            ));
        }

        summary.trim().to_string()
    }
}
