//! Grammar rules for resource paths, expressions and query options
//!
//! - `expressions` - The operator precedence chain (`or` down to unary `-`)
//! - `primary` - Literals, parenthesized expressions, function calls, paths, lambdas
//! - `resource_path` - Path segments, key predicates and operation parameters
//! - `query_options` - `$select`, `$orderby` and `$expand` with nested options
//!
//! The rules are generic over [`ExpressionParser`] so they can run against any
//! token source. Every rule returns the tree it recognized or the first
//! [`SyntaxError`]; there is no recovery.

pub mod expressions;
pub mod primary;
pub mod query_options;
pub mod resource_path;

use text_size::TextRange;

use crate::base::Name;
use crate::parser::errors::{ErrorCode, SyntaxError};
use crate::parser::lexer::TokenKind;

pub use expressions::parse_expression;
pub use primary::{parse_literal, parse_qualified_name};
pub use query_options::{parse_expand_items, parse_orderby_items, parse_select_items};
pub use resource_path::{parse_key_predicate, parse_resource_path, parse_segment_args};

/// Trait for grammar operations
///
/// This trait defines the interface between the grammar rules and the parser.
/// Trivia is skipped by the parser, so every inspection method sees the next
/// significant token.
pub trait ExpressionParser {
    // Token inspection
    fn current_kind(&self) -> Option<TokenKind>;
    fn current_text(&self) -> &str;
    fn current_range(&self) -> TextRange;
    fn at(&self, kind: TokenKind) -> bool;
    fn at_any(&self, kinds: &[TokenKind]) -> bool;
    fn at_eof(&self) -> bool;
    fn at_name_token(&self) -> bool;

    /// Peek at the kind of the nth significant token ahead
    fn peek_kind(&self, n: usize) -> Option<TokenKind>;
    fn peek_range(&self, n: usize) -> Option<TextRange>;

    // Token consumption
    fn bump(&mut self);
    fn eat(&mut self, kind: TokenKind) -> bool;
    fn expect(&mut self, kind: TokenKind, code: ErrorCode) -> Result<(), SyntaxError>;

    // Errors
    /// Error at the current token, carrying the unparsed remainder.
    fn error(&self, code: ErrorCode, message: impl Into<String>) -> SyntaxError;

    // Nesting guard
    fn enter(&mut self) -> Result<(), SyntaxError>;
    fn leave(&mut self);

    // Lambda variable scope
    fn lambda_variables(&self) -> &[Name];
    fn push_lambda_variable(&mut self, name: Name);
    fn pop_lambda_variable(&mut self);

    /// Compare a system option name under the configured case rule
    fn option_name_eq(&self, written: &str, expected: &str) -> bool;
}

/// Run `rule` one nesting level deeper.
pub(crate) fn nested<P, T>(
    p: &mut P,
    rule: impl FnOnce(&mut P) -> Result<T, SyntaxError>,
) -> Result<T, SyntaxError>
where
    P: ExpressionParser,
{
    p.enter()?;
    let result = rule(p);
    p.leave();
    result
}

/// Error for a token that does not fit the current rule.
///
/// Lexer errors and premature end of input get their own codes.
pub(crate) fn unexpected<P: ExpressionParser>(p: &P, expected: &str) -> SyntaxError {
    match p.current_kind() {
        None => p.error(ErrorCode::E0406, format!("expected {expected}, found end of input")),
        Some(TokenKind::Error) if p.current_text().starts_with('\'') => {
            p.error(ErrorCode::E0102, "unterminated string literal")
        }
        Some(TokenKind::Error) => p.error(
            ErrorCode::E0101,
            format!("invalid character '{}'", p.current_text()),
        ),
        Some(kind) => p.error(
            ErrorCode::E0901,
            format!("expected {expected}, found {} '{}'", kind.describe(), p.current_text()),
        ),
    }
}
