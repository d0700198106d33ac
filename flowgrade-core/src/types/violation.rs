//! Judge-reported flaws

use serde::{Deserialize, Serialize};

/// How badly a violation affects the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Prevents the workflow from doing what was asked
    Critical,
    Major,
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single deduction-worthy flaw found within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type", alias = "severity")]
    pub severity: Severity,

    pub description: String,

    /// Points taken off the 100-point scale (never negative)
    #[serde(rename = "pointsDeducted")]
    pub points_deducted: f64,
}

impl Violation {
    pub fn new(severity: Severity, description: impl Into<String>, points_deducted: f64) -> Self {
        Self {
            severity,
            description: description.into(),
            points_deducted,
        }
    }

    pub fn critical(description: impl Into<String>, points_deducted: f64) -> Self {
        Self::new(Severity::Critical, description, points_deducted)
    }

    pub fn major(description: impl Into<String>, points_deducted: f64) -> Self {
        Self::new(Severity::Major, description, points_deducted)
    }

    pub fn minor(description: impl Into<String>, points_deducted: f64) -> Self {
        Self::new(Severity::Minor, description, points_deducted)
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
