//! URI text to syntax trees.
//!
//! ```text
//! raw URI ──► uri::split_uri ──► percent decoding
//!                 │
//!                 ├── path  ──► lexer ──► grammar::resource_path ──► RawPath
//!                 └── query ──► options ──► lexer ──► grammar::{expressions, query_options}
//! ```
//!
//! Everything here is pure syntax: no EDM lookups happen until the
//! [`semantic`](crate::semantic) pass.

pub mod errors;
pub mod grammar;
pub mod lexer;
mod options;
mod parser;
pub mod uri;

pub use errors::{ErrorCode, ParseContext, SyntaxError};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use options::{parse_format, parse_query_options};
pub use parser::Parser;

use crate::config::ParserConfig;
use crate::syntax::{ExpandItem, Expr, KeyPredicate, Literal, OrderByItem, RawPath, SelectItem};

/// Run a grammar rule over `input`, requiring it to consume everything.
pub(crate) fn run<'a, T>(
    input: &'a str,
    config: &ParserConfig,
    rule: impl FnOnce(&mut Parser<'a>) -> Result<T, SyntaxError>,
) -> Result<T, SyntaxError> {
    Parser::new(input, config).parse_all(rule)
}

/// Parse a `$filter`-style expression.
///
/// ```
/// use odata::parser::parse_expression;
/// use odata::syntax::Expr;
///
/// let expr = parse_expression("Price gt 5 and Name eq 'x'").unwrap();
/// assert!(matches!(expr, Expr::And(_, _)));
/// ```
pub fn parse_expression(input: &str) -> Result<Expr, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_expression)
}

/// Parse a resource path (after the service root) without resolving it.
pub fn parse_raw_path(input: &str) -> Result<RawPath, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_resource_path)
}

/// Parse a parenthesized key predicate such as `(1)` or `(k1=1,k2='a')`.
pub fn parse_key_predicate(input: &str) -> Result<KeyPredicate, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_key_predicate)
}

/// Parse a single literal such as `'text'`, `2024-01-02` or `duration'P1D'`.
pub fn parse_literal(input: &str) -> Result<Literal, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_literal)
}

pub fn parse_select(input: &str) -> Result<Vec<SelectItem>, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_select_items)
}

pub fn parse_orderby(input: &str) -> Result<Vec<OrderByItem>, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_orderby_items)
}

pub fn parse_expand(input: &str) -> Result<Vec<ExpandItem>, SyntaxError> {
    run(input, &ParserConfig::default(), grammar::parse_expand_items)
}
