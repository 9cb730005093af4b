//! The error type returned by the public entry points.

use thiserror::Error;

use crate::parser::SyntaxError;
use crate::semantic::ResolveError;

/// Why a request URI was rejected.
///
/// Every variant is a client error; none is retried or recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The text does not match the URI grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The text is well formed but does not fit the entity data model.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("unsupported format '{requested}', expected one of: {}", supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<String>,
    },
}

impl Error {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolve(_))
    }

    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }
}
