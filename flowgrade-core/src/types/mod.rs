//! Result, violation and input types shared by every category.
//!
//! Wire names follow the camelCase shape judges are asked to produce
//! (`pointsDeducted`, `overallScore`, violation severity under `type`).

mod category;
mod input;
mod result;
mod violation;

pub use category::{
    BestPracticesResult, CategoryResult, EfficiencyResult, MaintainabilityResult, ScoredCategory,
    StructuralSimilarityResult,
};
pub use input::{EvaluationInput, Preset, TestCase, WorkflowDocument};
pub use result::EvaluationResult;
pub use violation::{Severity, Violation};
