//! Evaluation categories
//!
//! Each quality dimension of a workflow is graded by its own judge call.
//! [`Category`] carries the fixed per-category facts (wire name, weight,
//! summary wording); the submodules bind a rubric to the oracle and turn
//! its answer into a typed result.

use async_trait::async_trait;
use std::fmt;

use crate::error::Result;
use crate::types::{EvaluationInput, ScoredCategory};

pub mod best_practices;
pub mod chain;
pub mod connections;
pub mod data_flow;
pub mod efficiency;
pub mod expressions;
pub mod functionality;
pub mod maintainability;
pub mod node_configuration;
pub mod structural_similarity;

pub use best_practices::{BestPracticesEvaluator, LoadedBestPractices};
pub use chain::{EvaluatorChain, PromptVariables, render_template};
pub use connections::ConnectionsEvaluator;
pub use data_flow::DataFlowEvaluator;
pub use efficiency::EfficiencyEvaluator;
pub use expressions::ExpressionsEvaluator;
pub use functionality::FunctionalityEvaluator;
pub use maintainability::MaintainabilityEvaluator;
pub use node_configuration::NodeConfigurationEvaluator;
pub use structural_similarity::{InapplicableComparator, StructuralComparator};

/// One evaluated quality dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Functionality,
    Connections,
    Expressions,
    NodeConfiguration,
    Efficiency,
    DataFlow,
    Maintainability,
    BestPractices,
    StructuralSimilarity,
}

impl Category {
    /// The always-evaluated categories, in declared order
    pub const NAMED: [Category; 8] = [
        Category::Functionality,
        Category::Connections,
        Category::Expressions,
        Category::NodeConfiguration,
        Category::Efficiency,
        Category::DataFlow,
        Category::Maintainability,
        Category::BestPractices,
    ];

    /// Every category slot of an [`EvaluationResult`](crate::types::EvaluationResult)
    pub const ALL: [Category; 9] = [
        Category::Functionality,
        Category::Connections,
        Category::Expressions,
        Category::NodeConfiguration,
        Category::Efficiency,
        Category::DataFlow,
        Category::Maintainability,
        Category::BestPractices,
        Category::StructuralSimilarity,
    ];

    /// Wire name, as used in result JSON and critical-issue prefixes
    pub fn name(&self) -> &'static str {
        match self {
            Category::Functionality => "functionality",
            Category::Connections => "connections",
            Category::Expressions => "expressions",
            Category::NodeConfiguration => "nodeConfiguration",
            Category::Efficiency => "efficiency",
            Category::DataFlow => "dataFlow",
            Category::Maintainability => "maintainability",
            Category::BestPractices => "bestPractices",
            Category::StructuralSimilarity => "structuralSimilarity",
        }
    }

    /// Nominal weight in the overall score.
    ///
    /// The eight named weights sum to 1.05 and all nine to 1.10; the
    /// aggregator divides by the included sum, so only ratios matter.
    pub fn weight(&self) -> f64 {
        match self {
            Category::Functionality => 0.25,
            Category::Connections => 0.15,
            Category::Expressions => 0.15,
            Category::NodeConfiguration => 0.15,
            Category::Efficiency => 0.10,
            Category::DataFlow => 0.10,
            Category::Maintainability => 0.05,
            Category::BestPractices => 0.10,
            Category::StructuralSimilarity => 0.05,
        }
    }

    /// Phrase used in the summary when the category scores well
    pub fn strength_label(&self) -> &'static str {
        match self {
            Category::Functionality => "strong functional implementation",
            Category::Connections => "well-connected nodes",
            Category::Expressions => "correct expression syntax",
            Category::NodeConfiguration => "well-configured nodes",
            Category::Efficiency => "efficient design",
            Category::DataFlow => "proper data flow",
            Category::Maintainability => "maintainable structure",
            Category::BestPractices => "follows best practices",
            Category::StructuralSimilarity => "close match to the reference workflow",
        }
    }

    /// Phrase used in the summary when the category scores poorly
    pub fn weakness_label(&self) -> &'static str {
        match self {
            Category::Functionality => "functional gaps",
            Category::Connections => "connection issues",
            Category::Expressions => "expression errors",
            Category::NodeConfiguration => "node configuration issues",
            Category::Efficiency => "inefficiencies",
            Category::DataFlow => "data flow problems",
            Category::Maintainability => "poor maintainability",
            Category::BestPractices => "deviates from best practices",
            Category::StructuralSimilarity => "structural divergence from the reference workflow",
        }
    }

    /// Headline of the category's rubric.
    ///
    /// Appears verbatim in the system prompt of exactly one judge request,
    /// so it identifies which category a request belongs to.
    pub fn focus(&self) -> &'static str {
        match self {
            Category::Functionality => "FUNCTIONAL CORRECTNESS",
            Category::Connections => "NODE CONNECTIONS",
            Category::Expressions => "EXPRESSION SYNTAX",
            Category::NodeConfiguration => "NODE CONFIGURATION",
            Category::Efficiency => "WORKFLOW EFFICIENCY",
            Category::DataFlow => "DATA FLOW and TRANSFORMATION ACCURACY",
            Category::Maintainability => "WORKFLOW MAINTAINABILITY",
            Category::BestPractices => "BEST PRACTICES ADHERENCE",
            Category::StructuralSimilarity => "STRUCTURAL SIMILARITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A judge-backed grader for one category
#[async_trait]
pub trait CategoryEvaluator: Send + Sync {
    /// The result shape this category produces
    type Output: ScoredCategory + Send;

    fn category(&self) -> Category;

    /// Grade `input`. Each call issues its judge requests exactly once.
    async fn evaluate(&self, input: &EvaluationInput) -> Result<Self::Output>;
}
