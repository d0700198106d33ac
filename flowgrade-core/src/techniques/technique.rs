//! Workflow building techniques

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A common building block a workflow can combine with others
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowTechnique {
    Scheduling,
    Chatbot,
    FormInput,
    ScrapingAndResearch,
    Monitoring,
    Enrichment,
    Triage,
    ContentGeneration,
    DocumentProcessing,
    DataExtraction,
    DataAnalysis,
    DataTransformation,
    Notification,
    KnowledgeBase,
    HumanInTheLoop,
}

impl WorkflowTechnique {
    pub const ALL: [WorkflowTechnique; 15] = [
        WorkflowTechnique::Scheduling,
        WorkflowTechnique::Chatbot,
        WorkflowTechnique::FormInput,
        WorkflowTechnique::ScrapingAndResearch,
        WorkflowTechnique::Monitoring,
        WorkflowTechnique::Enrichment,
        WorkflowTechnique::Triage,
        WorkflowTechnique::ContentGeneration,
        WorkflowTechnique::DocumentProcessing,
        WorkflowTechnique::DataExtraction,
        WorkflowTechnique::DataAnalysis,
        WorkflowTechnique::DataTransformation,
        WorkflowTechnique::Notification,
        WorkflowTechnique::KnowledgeBase,
        WorkflowTechnique::HumanInTheLoop,
    ];

    /// Identifier used on the wire and in documentation headings
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowTechnique::Scheduling => "scheduling",
            WorkflowTechnique::Chatbot => "chatbot",
            WorkflowTechnique::FormInput => "form_input",
            WorkflowTechnique::ScrapingAndResearch => "scraping_and_research",
            WorkflowTechnique::Monitoring => "monitoring",
            WorkflowTechnique::Enrichment => "enrichment",
            WorkflowTechnique::Triage => "triage",
            WorkflowTechnique::ContentGeneration => "content_generation",
            WorkflowTechnique::DocumentProcessing => "document_processing",
            WorkflowTechnique::DataExtraction => "data_extraction",
            WorkflowTechnique::DataAnalysis => "data_analysis",
            WorkflowTechnique::DataTransformation => "data_transformation",
            WorkflowTechnique::Notification => "notification",
            WorkflowTechnique::KnowledgeBase => "knowledge_base",
            WorkflowTechnique::HumanInTheLoop => "human_in_the_loop",
        }
    }

    /// One-line description shown to the categorizer
    pub fn description(&self) -> &'static str {
        match self {
            WorkflowTechnique::Scheduling => "Running an action at a specific time or interval",
            WorkflowTechnique::Chatbot => {
                "Receiving chat messages and replying (built-in chat, Telegram, Slack, MS Teams, etc.)"
            }
            WorkflowTechnique::FormInput => "Gathering data from users via forms",
            WorkflowTechnique::ScrapingAndResearch => {
                "Methodically collecting information from websites or APIs to compile structured data"
            }
            WorkflowTechnique::Monitoring => {
                "Repeatedly checking service or website status and acting when conditions are met"
            }
            WorkflowTechnique::Enrichment => {
                "Adding extra details to existing data by merging information from other sources"
            }
            WorkflowTechnique::Triage => "Classifying data for routing or prioritization",
            WorkflowTechnique::ContentGeneration => "Creating text, images, audio, video, etc.",
            WorkflowTechnique::DocumentProcessing => {
                "Taking action on content within files (PDFs, Word docs, images)"
            }
            WorkflowTechnique::DataExtraction => {
                "Pulling specific information from structured or unstructured inputs"
            }
            WorkflowTechnique::DataAnalysis => {
                "Examining data to find patterns, trends, anomalies, or insights"
            }
            WorkflowTechnique::DataTransformation => {
                "Cleaning, formatting, or restructuring data (including summarization)"
            }
            WorkflowTechnique::Notification => {
                "Sending alerts or updates via email, chat, SMS when events occur"
            }
            WorkflowTechnique::KnowledgeBase => {
                "Building or using a centralized information collection (usually a vector database for LLM use)"
            }
            WorkflowTechnique::HumanInTheLoop => "Pausing for human decision or input before resuming",
        }
    }
}

impl fmt::Display for WorkflowTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known technique
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown workflow technique: {0}")]
pub struct UnknownTechnique(pub String);

impl FromStr for WorkflowTechnique {
    type Err = UnknownTechnique;

    /// Accepts `form_input`, `form-input`, `Form Input` and similar spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        WorkflowTechnique::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| UnknownTechnique(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!("form_input".parse(), Ok(WorkflowTechnique::FormInput));
        assert_eq!("content-generation".parse(), Ok(WorkflowTechnique::ContentGeneration));
        assert_eq!(" Human In The Loop ".parse(), Ok(WorkflowTechnique::HumanInTheLoop));
        assert!("teleportation".parse::<WorkflowTechnique>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for technique in WorkflowTechnique::ALL {
            let value = serde_json::to_value(technique).unwrap();
            assert_eq!(value, technique.as_str());
        }
    }
}
