//! Foundation types for the URI parser.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Name`] - Cheap-to-clone identifier text
//! - [`TextRange`], [`TextSize`] - Byte offsets into the text being parsed
//! - Protocol constants (system query option names, path keywords, media types)
//! - Identifier rules shared by the lexer, the EDM builder and the resolver
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod text_utils;

pub use text_utils::{is_identifier, is_qualified_name, split_qualified_name};

/// Identifier text. Short names are stored inline without allocation.
pub type Name = smol_str::SmolStr;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
