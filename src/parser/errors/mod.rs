//! Parser error handling module
//!
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages
//! - The unparsed remainder carried with every error

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::ParseContext;
pub use error::SyntaxError;

#[cfg(test)]
mod tests;
