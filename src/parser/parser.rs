//! Recursive descent parser over the logos token stream
//!
//! Holds all per-parse state: token position, nesting depth and the lambda
//! variables in scope. Nothing here outlives a single parse call.

use text_size::{TextRange, TextSize};

use super::errors::{ErrorCode, SyntaxError};
use super::grammar::ExpressionParser;
use super::lexer::{Token, TokenKind, tokenize};
use crate::base::Name;
use crate::config::ParserConfig;

/// The parser state
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
    max_depth: usize,
    case_insensitive_options: bool,
    lambda_scope: Vec<Name>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, config: &ParserConfig) -> Self {
        let mut parser = Self {
            input,
            tokens: tokenize(input),
            pos: 0,
            depth: 0,
            max_depth: config.max_expression_depth,
            case_insensitive_options: config.case_insensitive_options,
            lambda_scope: Vec::new(),
        };
        parser.skip_trivia();
        parser
    }

    /// Run `rule` and require that it consumed the whole input.
    pub fn parse_all<T>(
        mut self,
        rule: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        let value = rule(&mut self)?;
        self.finish()?;
        Ok(value)
    }

    fn finish(&self) -> Result<(), SyntaxError> {
        match self.current_kind() {
            None => Ok(()),
            Some(TokenKind::RParen) => Err(self.error(ErrorCode::E0202, "unexpected ')'")),
            Some(TokenKind::Error) => Err(super::grammar::unexpected(self, "end of input")),
            Some(_) => Err(self.error(
                ErrorCode::E0203,
                format!("unexpected '{}' after a complete expression", self.current_text()),
            )),
        }
    }

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn peek(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn skip_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.pos += 1;
        }
    }

    fn end_offset(&self) -> TextSize {
        TextSize::of(self.input)
    }
}

impl ExpressionParser for Parser<'_> {
    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|t| t.kind)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn current_range(&self) -> TextRange {
        self.current()
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(self.end_offset()))
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        self.current_kind().is_some_and(|k| kinds.contains(&k))
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_name_token(&self) -> bool {
        self.current_kind().is_some_and(|k| k.is_name())
    }

    fn peek_kind(&self, n: usize) -> Option<TokenKind> {
        self.peek(n).map(|t| t.kind)
    }

    fn peek_range(&self, n: usize) -> Option<TextRange> {
        self.peek(n).map(|t| t.range)
    }

    fn bump(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
            self.skip_trivia();
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, code: ErrorCode) -> Result<(), SyntaxError> {
        if self.eat(kind) {
            return Ok(());
        }
        let found = match self.current_kind() {
            None => "end of input".to_string(),
            Some(found) => format!("{} '{}'", found.describe(), self.current_text()),
        };
        Err(self.error(code, format!("expected {}, found {found}", kind.describe())))
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>) -> SyntaxError {
        let range = self.current_range();
        let fragment = self.input.get(usize::from(range.start())..).unwrap_or("");
        SyntaxError::new(message, range, code).with_fragment(fragment)
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(self.error(
                ErrorCode::E0407,
                format!("expression nested deeper than {} levels", self.max_depth),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn lambda_variables(&self) -> &[Name] {
        &self.lambda_scope
    }

    fn push_lambda_variable(&mut self, name: Name) {
        self.lambda_scope.push(name);
    }

    fn pop_lambda_variable(&mut self) {
        self.lambda_scope.pop();
    }

    fn option_name_eq(&self, written: &str, expected: &str) -> bool {
        if self.case_insensitive_options {
            written.eq_ignore_ascii_case(expected)
        } else {
            written == expected
        }
    }
}
