//! JSON payload extraction with light repair

use regex::Regex;
use std::sync::LazyLock;

use super::{ParseError, ParseResult};

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:json|JSON)?\s*\n?([\s\S]*?)\n?```").expect("valid code fence regex")
});

/// Recovers a JSON object from a judge's text response
#[derive(Debug, Clone)]
pub struct JudgePayloadParser {
    repair: bool,
}

impl JudgePayloadParser {
    /// Create a parser that strips fences and repairs trailing commas
    pub fn new() -> Self {
        Self { repair: true }
    }

    /// Create a strict parser (no repair)
    pub fn strict() -> Self {
        Self { repair: false }
    }

    /// Parse raw judge text into a JSON object
    pub fn parse(&self, raw: &str) -> ParseResult<serde_json::Value> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let unfenced = strip_code_fences(trimmed);

        let mut candidates = vec![unfenced.to_string()];
        if let Some(extracted) = extract_object(unfenced) {
            candidates.push(extracted.to_string());
        }

        for candidate in &candidates {
            if let Some(value) = self.try_parse(candidate) {
                return into_object(value);
            }
        }

        Err(ParseError::InvalidFormat(
            "no JSON object found in judge response".to_string(),
        ))
    }

    fn try_parse(&self, candidate: &str) -> Option<serde_json::Value> {
        if let Ok(value) = serde_json::from_str(candidate) {
            return Some(value);
        }
        if self.repair {
            return serde_json::from_str(&remove_trailing_commas(candidate)).ok();
        }
        None
    }
}

impl Default for JudgePayloadParser {
    fn default() -> Self {
        Self::new()
    }
}

fn into_object(value: serde_json::Value) -> ParseResult<serde_json::Value> {
    match value {
        serde_json::Value::Object(_) => Ok(value),
        serde_json::Value::Array(_) => Err(ParseError::NotAnObject("array".to_string())),
        serde_json::Value::String(_) => Err(ParseError::NotAnObject("string".to_string())),
        serde_json::Value::Number(_) => Err(ParseError::NotAnObject("number".to_string())),
        serde_json::Value::Bool(_) => Err(ParseError::NotAnObject("boolean".to_string())),
        serde_json::Value::Null => Err(ParseError::NotAnObject("null".to_string())),
    }
}

fn strip_code_fences(input: &str) -> &str {
    CODE_FENCE_RE
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(input)
}

/// Drop commas directly before `}` or `]`, leaving string contents alone
fn remove_trailing_commas(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in input.char_indices() {
        if escape_next {
            escape_next = false;
        } else if in_string {
            match c {
                '\\' => escape_next = true,
                '"' => in_string = false,
                _ => {}
            }
        } else if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = input[i + 1..].trim_start().chars().next();
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }
        output.push(c);
    }

    output
}

/// Slice the first balanced `{...}` out of surrounding prose
fn extract_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;
    let substring = &input[start..];
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in substring.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&substring[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}
