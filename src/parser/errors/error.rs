//! Syntax error type
//!
//! Carries an error code, the byte range of the offending token and the
//! unparsed remainder of the input starting there.

use text_size::{TextRange, TextSize};
use thiserror::Error;

use super::codes::ErrorCode;
use super::context::ParseContext;
use crate::syntax::LiteralFormatError;

/// A syntax error: the grammar did not match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// Source location
    pub range: TextRange,
    /// Categorized error code
    pub code: ErrorCode,
    /// Input from the failure point onwards
    pub fragment: String,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
}

impl SyntaxError {
    /// Create a new syntax error with minimal information
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            fragment: String::new(),
            hint: None,
        }
    }

    /// Create an error at a specific offset with zero-width range
    pub fn at_offset(message: impl Into<String>, offset: TextSize, code: ErrorCode) -> Self {
        Self::new(message, TextRange::empty(offset), code)
    }

    /// Create an error for a whole input that failed a simple check.
    pub fn for_input(code: ErrorCode, message: impl Into<String>, input: &str) -> Self {
        Self::at_offset(message, TextSize::new(0), code).with_fragment(input)
    }

    /// Add a hint to this error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    /// Append the context the error occurred in to the message.
    pub fn in_context(mut self, context: ParseContext) -> Self {
        self.message = format!("{} {}", self.message, context.description());
        self
    }

    /// Check if this error has a hint
    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    pub fn from_literal(error: LiteralFormatError, range: TextRange) -> Self {
        Self::new(error.to_string(), range, ErrorCode::E0601)
    }
}
