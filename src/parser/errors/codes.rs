//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (invalid tokens, bad percent-encoding)
//! - E02xx: Structural errors (parentheses, trailing input)
//! - E03xx: Resource path errors
//! - E04xx: Expression errors
//! - E05xx: Query option errors
//! - E06xx: Literal errors
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character
    E0101,
    /// Unterminated string literal
    E0102,
    /// Invalid percent-encoding
    E0103,

    // =========================================================================
    // E02xx: Structural errors
    // =========================================================================
    /// Unclosed parenthesis `(`
    E0201,
    /// Unexpected closing delimiter
    E0202,
    /// Input left over after a complete production
    E0203,

    // =========================================================================
    // E03xx: Resource path errors
    // =========================================================================
    /// Missing segment name
    E0301,
    /// Invalid key predicate or parameter list
    E0302,
    /// Duplicate key or parameter name
    E0303,
    /// URI does not start with the service root
    E0304,

    // =========================================================================
    // E04xx: Expression errors
    // =========================================================================
    /// Invalid expression
    E0401,
    /// Unknown function
    E0403,
    /// Unclosed function call
    E0404,
    /// Invalid lambda expression
    E0405,
    /// Missing expression where expected
    E0406,
    /// Nesting too deep
    E0407,
    /// Lambda variable already in scope
    E0408,
    /// Wrong number of function arguments
    E0409,

    // =========================================================================
    // E05xx: Query option errors
    // =========================================================================
    /// Unknown system query option
    E0501,
    /// System query option repeated
    E0502,
    /// Invalid query option value
    E0503,
    /// Query option not allowed on this resource
    E0504,

    // =========================================================================
    // E06xx: Literal errors
    // =========================================================================
    /// Malformed or out-of-range literal
    E0601,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Expected a specific token
    E0902,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            Self::E0401 => "E0401",
            Self::E0403 => "E0403",
            Self::E0404 => "E0404",
            Self::E0405 => "E0405",
            Self::E0406 => "E0406",
            Self::E0407 => "E0407",
            Self::E0408 => "E0408",
            Self::E0409 => "E0409",
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E0504 => "E0504",
            Self::E0601 => "E0601",
            Self::E0901 => "E0901",
            Self::E0902 => "E0902",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 => "structural error",
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304 => "resource path error",
            Self::E0401
            | Self::E0403
            | Self::E0404
            | Self::E0405
            | Self::E0406
            | Self::E0407
            | Self::E0408
            | Self::E0409 => "expression error",
            Self::E0501 | Self::E0502 | Self::E0503 | Self::E0504 => "query option error",
            Self::E0601 => "literal error",
            Self::E0901 | Self::E0902 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "invalid percent-encoding",
            Self::E0201 => "unclosed parenthesis",
            Self::E0202 => "unexpected closing delimiter",
            Self::E0203 => "unexpected trailing input",
            Self::E0301 => "missing segment name",
            Self::E0302 => "invalid key predicate",
            Self::E0303 => "duplicate name",
            Self::E0304 => "service root mismatch",
            Self::E0401 => "invalid expression",
            Self::E0403 => "unknown function",
            Self::E0404 => "unclosed function call",
            Self::E0405 => "invalid lambda expression",
            Self::E0406 => "expected expression",
            Self::E0407 => "expression nested too deeply",
            Self::E0408 => "lambda variable already defined",
            Self::E0409 => "wrong number of arguments",
            Self::E0501 => "unknown system query option",
            Self::E0502 => "duplicate system query option",
            Self::E0503 => "invalid query option value",
            Self::E0504 => "query option not allowed here",
            Self::E0601 => "invalid literal",
            Self::E0901 => "unexpected token",
            Self::E0902 => "expected token",
        }
    }

    /// Check if this is a structural error (delimiter-related)
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::E0201 | Self::E0202 | Self::E0203)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
