//! Judge Output Parsing
//!
//! Extracts the JSON payload from raw judge text. Providers without a native
//! JSON mode often wrap the object in markdown fences or prose; the parser
//! recovers the object so schema validation can run on it.
//!
//! # Example
//!
//! ```rust
//! use flowgrade_core::parsing::JudgePayloadParser;
//!
//! let parser = JudgePayloadParser::new();
//! let value = parser.parse("```json\n{\"score\": 0.9,}\n```").unwrap();
//! assert_eq!(value["score"], 0.9);
//! ```

mod json;

pub use json::JudgePayloadParser;

use thiserror::Error;

/// Error type for payload extraction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// No JSON object could be recovered
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Payload was valid JSON but not an object
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(String),

    /// Empty input
    #[error("Empty input")]
    EmptyInput,
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
