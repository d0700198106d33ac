//! # Flowgrade - LLM-judged evaluation for generated workflows
//!
//! Flowgrade grades an automation workflow produced from a natural-language
//! request. Eight independent quality categories are each judged by a
//! structured-output language model:
//! - functionality, connections, expressions, node configuration
//! - efficiency and maintainability (scored from three sub-metrics each)
//! - data flow
//! - best practices (guided by per-technique documentation)
//!
//! A ninth category, structural similarity against a reference workflow, is
//! pluggable and excluded from scoring unless applicable. The per-category
//! results are reduced to one weighted overall score, a short summary and a
//! list of critical issues.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowgrade_core::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn run(judge: Arc<dyn LLMProvider>) -> Result<()> {
//! let evaluator = WorkflowEvaluator::builder(judge)
//!     .config(FlowgradeConfig::load()?)
//!     .build()?;
//!
//! let input = EvaluationInput::new(
//!     "Every morning, post the weather forecast to Slack",
//!     json!({"nodes": [], "connections": {}}),
//! );
//! let result = evaluator.evaluate(&input).await?;
//! println!("{:.2}: {}", result.overall_score, result.summary);
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure handling
//!
//! By default a category whose judge call fails is replaced by a degraded
//! result (score 0 plus an "Evaluation unavailable" violation) so the other
//! categories still count. [`FailurePolicy::Propagate`](config::FailurePolicy)
//! aborts instead. A judge without structured-output support is always
//! rejected when the evaluator is built.

pub mod categories;
pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod logging;
pub mod parsing;
pub mod techniques;
pub mod types;
pub mod validation;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::categories::{
        Category, CategoryEvaluator, InapplicableComparator, StructuralComparator,
    };
    pub use crate::config::{
        ConfigBuilder, EvaluationConfig, FailurePolicy, FlowgradeConfig, JudgeConfig,
    };
    pub use crate::engine::{WorkflowEvaluator, WorkflowEvaluatorBuilder, evaluate};
    pub use crate::error::{FlowgradeError, Result};
    pub use crate::llm::{
        LLMProvider, LLMRequest, LLMResponse, Message, MessageRole, ScriptedProvider,
        ScriptedResponse,
    };
    pub use crate::techniques::{
        BestPracticesDocument, BestPracticesRegistry, LLMPromptCategorizer,
        PromptCategorization, PromptCategorizer, StaticDocument, WorkflowTechnique,
    };
    pub use crate::types::{
        BestPracticesResult, CategoryResult, EfficiencyResult, EvaluationInput,
        EvaluationResult, MaintainabilityResult, Preset, ScoredCategory, Severity,
        StructuralSimilarityResult, TestCase, Violation, WorkflowDocument,
    };
}
