//! Workflow techniques and their best-practices documentation
//!
//! The best-practices category first asks which techniques a request
//! involves ([`PromptCategorizer`]), then looks each one up in a
//! [`BestPracticesRegistry`] that is built once and injected.

pub mod categorization;
pub mod registry;
pub mod technique;

pub use categorization::{LLMPromptCategorizer, PromptCategorization, PromptCategorizer};
pub use registry::{BestPracticesDocument, BestPracticesRegistry, StaticDocument};
pub use technique::{UnknownTechnique, WorkflowTechnique};
