//! Structural similarity against a reference workflow
//!
//! Reference diffing is not implemented here; it is supplied through
//! [`StructuralComparator`]. The default comparator reports the category as
//! not applicable, which removes its weight from the overall score.

use crate::types::{EvaluationInput, StructuralSimilarityResult};

/// Compares a generated workflow with its reference(s)
pub trait StructuralComparator: Send + Sync {
    fn compare(&self, input: &EvaluationInput) -> StructuralSimilarityResult;
}

/// Always reports the category as not evaluated
#[derive(Debug, Clone, Copy, Default)]
pub struct InapplicableComparator;

impl StructuralComparator for InapplicableComparator {
    fn compare(&self, _input: &EvaluationInput) -> StructuralSimilarityResult {
        StructuralSimilarityResult::inapplicable()
    }
}
