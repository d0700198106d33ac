//! Technique to best-practices documentation lookup

use std::collections::HashMap;
use std::sync::Arc;

use super::technique::WorkflowTechnique;
use crate::error::Result;

/// Best-practices guidance for one technique
pub trait BestPracticesDocument: Send + Sync {
    fn technique(&self) -> WorkflowTechnique;

    fn version(&self) -> &str;

    /// Markdown guidance handed to the best-practices judge
    fn documentation(&self) -> Result<String>;
}

/// Documentation held in memory
#[derive(Debug, Clone)]
pub struct StaticDocument {
    technique: WorkflowTechnique,
    version: String,
    content: String,
}

impl StaticDocument {
    pub fn new(
        technique: WorkflowTechnique,
        version: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            technique,
            version: version.into(),
            content: content.into(),
        }
    }
}

impl BestPracticesDocument for StaticDocument {
    fn technique(&self) -> WorkflowTechnique {
        self.technique
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn documentation(&self) -> Result<String> {
        Ok(self.content.clone())
    }
}

const BUILTIN_VERSION: &str = "1.0.0";

const BUILTIN_DOCS: [(WorkflowTechnique, &str); 5] = [
    (WorkflowTechnique::DataAnalysis, include_str!("docs/data_analysis.md")),
    (WorkflowTechnique::Scheduling, include_str!("docs/scheduling.md")),
    (WorkflowTechnique::Notification, include_str!("docs/notification.md")),
    (WorkflowTechnique::Chatbot, include_str!("docs/chatbot.md")),
    (WorkflowTechnique::ContentGeneration, include_str!("docs/content_generation.md")),
];

/// Explicit technique to documentation mapping.
///
/// A technique without an entry simply has no documentation.
#[derive(Clone, Default)]
pub struct BestPracticesRegistry {
    documents: HashMap<WorkflowTechnique, Arc<dyn BestPracticesDocument>>,
}

impl std::fmt::Debug for BestPracticesRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut techniques: Vec<_> = self.documents.keys().map(|t| t.as_str()).collect();
        techniques.sort_unstable();
        f.debug_struct("BestPracticesRegistry")
            .field("techniques", &techniques)
            .finish()
    }
}

impl BestPracticesRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the bundled documents
    pub fn builtin() -> Self {
        BUILTIN_DOCS
            .into_iter()
            .fold(Self::new(), |registry, (technique, content)| {
                registry.with_document(StaticDocument::new(technique, BUILTIN_VERSION, content))
            })
    }

    /// Add or replace the document for its technique
    pub fn register(&mut self, document: impl BestPracticesDocument + 'static) {
        self.documents.insert(document.technique(), Arc::new(document));
    }

    pub fn with_document(mut self, document: impl BestPracticesDocument + 'static) -> Self {
        self.register(document);
        self
    }

    pub fn get(&self, technique: WorkflowTechnique) -> Option<&dyn BestPracticesDocument> {
        self.documents.get(&technique).map(|doc| doc.as_ref())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_documents() {
        let registry = BestPracticesRegistry::builtin();
        assert_eq!(registry.len(), 5);

        let doc = registry.get(WorkflowTechnique::DataAnalysis).unwrap();
        assert_eq!(doc.version(), "1.0.0");
        assert!(doc.documentation().unwrap().starts_with("# Best Practices: Data Analysis"));

        assert!(registry.get(WorkflowTechnique::Triage).is_none());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = BestPracticesRegistry::builtin();
        registry.register(StaticDocument::new(WorkflowTechnique::Chatbot, "2.0.0", "short"));

        let doc = registry.get(WorkflowTechnique::Chatbot).unwrap();
        assert_eq!(doc.version(), "2.0.0");
        assert_eq!(doc.documentation().unwrap(), "short");
        assert_eq!(registry.len(), 5);
    }
}
