//! Critical issue extraction

use crate::types::EvaluationResult;

/// Flattens critical violations into `[category] description` strings
#[derive(Debug, Clone, Copy, Default)]
pub struct CriticalIssueExtractor;

impl CriticalIssueExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Critical issues in declared category order, violations in reported
    /// order. `None` when there are none.
    pub fn extract(&self, result: &EvaluationResult) -> Option<Vec<String>> {
        let issues: Vec<String> = result
            .named_categories()
            .flat_map(|(category, base)| {
                base.critical_violations()
                    .map(move |v| format!("[{}] {}", category, v.description))
            })
            .collect();

        if issues.is_empty() { None } else { Some(issues) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::result_with_scores;
    use crate::types::Violation;

    #[test]
    fn test_none_without_critical_violations() {
        let mut result = result_with_scores([0.5; 8]);
        result.expressions.violations.push(Violation::major("Missing = prefix", 15.0));
        assert_eq!(CriticalIssueExtractor.extract(&result), None);
    }

    #[test]
    fn test_declared_order() {
        let mut result = result_with_scores([0.5; 8]);
        result
            .connections
            .violations
            .push(Violation::critical("Trigger is disconnected", 50.0));
        result
            .functionality
            .violations
            .push(Violation::minor("Optional filter missing", 5.0));
        result
            .functionality
            .violations
            .push(Violation::critical("Email is never sent", 45.0));

        assert_eq!(
            CriticalIssueExtractor.extract(&result),
            Some(vec![
                "[functionality] Email is never sent".to_string(),
                "[connections] Trigger is disconnected".to_string(),
            ])
        );
    }

    #[test]
    fn test_extension_categories_use_wire_names() {
        let mut result = result_with_scores([0.5; 8]);
        result
            .node_configuration
            .violations
            .push(Violation::critical("Spreadsheet id missing", 35.0));
        result
            .maintainability
            .base
            .violations
            .push(Violation::critical("Unreadable", 40.0));

        let issues = CriticalIssueExtractor.extract(&result).unwrap();
        assert_eq!(issues[0], "[nodeConfiguration] Spreadsheet id missing");
        assert_eq!(issues[1], "[maintainability] Unreadable");
    }
}
