//! Parse context tracking for context-aware error messages
//!
//! Grammar rules tag an error with the construct it surfaced from as it
//! propagates; each tag appends a phrase to the message, innermost first, so
//! an error inside a lambda in `$filter` reads "... in lambda expression in $filter".

/// Represents the current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseContext {
    ResourcePath,
    KeyPredicate,
    Filter,
    OrderBy,
    Select,
    Expand,
    ExpandOptions,
    Lambda,
    MethodArguments,
}

impl ParseContext {
    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::ResourcePath => "in resource path",
            Self::KeyPredicate => "in key predicate",
            Self::Filter => "in $filter",
            Self::OrderBy => "in $orderby",
            Self::Select => "in $select",
            Self::Expand => "in $expand",
            Self::ExpandOptions => "in $expand options",
            Self::Lambda => "in lambda expression",
            Self::MethodArguments => "in function arguments",
        }
    }
}
