//! Error types for Flowgrade operations

/// Result type for Flowgrade operations
pub type Result<T> = std::result::Result<T, FlowgradeError>;

/// Error types for the evaluation engine
#[derive(Debug, thiserror::Error)]
pub enum FlowgradeError {
    /// Oracle or engine misconfiguration (e.g. no structured-output support)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A judge response could not be coerced into the expected result shape
    #[error("Oracle output error in '{category}': {reason}")]
    OracleOutput { category: String, reason: String },

    /// Best-practices documentation could not be resolved
    #[error("Documentation lookup error: {0}")]
    DocumentationLookup(String),

    /// The oracle call itself failed (transport, provider, timeout)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl FlowgradeError {
    /// Shorthand for an [`FlowgradeError::OracleOutput`]
    pub fn oracle_output(category: impl Into<String>, reason: impl Into<String>) -> Self {
        FlowgradeError::OracleOutput {
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error may be isolated to a single category.
    ///
    /// Configuration errors always abort the whole evaluation.
    pub fn is_category_local(&self) -> bool {
        !matches!(self, FlowgradeError::Configuration(_))
    }
}

impl From<String> for FlowgradeError {
    fn from(s: String) -> Self {
        FlowgradeError::Other(s)
    }
}

impl From<&str> for FlowgradeError {
    fn from(s: &str) -> Self {
        FlowgradeError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for FlowgradeError {
    fn from(err: anyhow::Error) -> Self {
        FlowgradeError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_output_display() {
        let err = FlowgradeError::oracle_output("efficiency", "score out of range");
        assert_eq!(
            err.to_string(),
            "Oracle output error in 'efficiency': score out of range"
        );
    }

    #[test]
    fn test_category_local() {
        assert!(FlowgradeError::Llm("timeout".into()).is_category_local());
        assert!(FlowgradeError::oracle_output("functionality", "bad").is_category_local());
        assert!(!FlowgradeError::Configuration("no structured output".into()).is_category_local());
    }

    #[test]
    fn test_from_conversions() {
        let err: FlowgradeError = "plain".into();
        assert!(matches!(err, FlowgradeError::Other(ref s) if s == "plain"));

        let err: FlowgradeError = anyhow::anyhow!("wrapped").into();
        assert_eq!(err.to_string(), "wrapped");
    }
}
