//! Logos-based lexer for URL path and query-option text.
//!
//! Input is already percent-decoded. Literal shapes (dates, guids, durations)
//! are recognized here so the grammar only dispatches on token kinds; logos'
//! longest-match rule keeps `2024-01-02` from lexing as `2024` `-01` `-02`.
//! Enum literals are not tokens: the grammar assembles them from a qualified
//! name immediately followed by a string.

use logos::Logos;
use text_size::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
        let span = self.inner.span();
        let range = TextRange::new(offset(span.start), offset(span.end));
        Some(Token {
            kind,
            text: self.inner.slice(),
            range,
        })
    }
}

fn offset(value: usize) -> TextSize {
    TextSize::new(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Anything the lexer could not match.
    Error,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"'([^']|'')*'")]
    String,

    #[regex(r"-?[0-9]+")]
    Integer,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+")]
    Decimal,

    /// `INF`, `-INF`, `NaN`
    #[token("INF")]
    #[token("-INF")]
    #[token("NaN")]
    NonFinite,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}")]
    Date,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}[Tt][0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?([Zz]|[+-][0-9]{2}:[0-9]{2})")]
    DateTimeOffset,

    #[regex(r"[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?")]
    TimeOfDay,

    #[regex(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")]
    Guid,

    #[regex(r"duration'[^']*'")]
    Duration,

    #[regex(r"(geography|geometry)'[^']*'")]
    Geo,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    /// `$filter`, `$it`, `$count`, ...
    #[regex(r"\$[A-Za-z]+")]
    SystemName,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,
    #[token("-")]
    Minus,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("and")]
    AndKw,
    #[token("or")]
    OrKw,
    #[token("not")]
    NotKw,
    #[token("eq")]
    EqKw,
    #[token("ne")]
    NeKw,
    #[token("gt")]
    GtKw,
    #[token("ge")]
    GeKw,
    #[token("lt")]
    LtKw,
    #[token("le")]
    LeKw,
    #[token("add")]
    AddKw,
    #[token("sub")]
    SubKw,
    #[token("mul")]
    MulKw,
    #[token("div")]
    DivKw,
    #[token("mod")]
    ModKw,
    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
    #[token("null")]
    NullKw,
    #[token("asc")]
    AscKw,
    #[token("desc")]
    DescKw,
    #[token("any")]
    AnyKw,
    #[token("all")]
    AllKw,
    #[token("max")]
    MaxKw,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::AndKw
                | Self::OrKw
                | Self::NotKw
                | Self::EqKw
                | Self::NeKw
                | Self::GtKw
                | Self::GeKw
                | Self::LtKw
                | Self::LeKw
                | Self::AddKw
                | Self::SubKw
                | Self::MulKw
                | Self::DivKw
                | Self::ModKw
                | Self::TrueKw
                | Self::FalseKw
                | Self::NullKw
                | Self::AscKw
                | Self::DescKw
                | Self::AnyKw
                | Self::AllKw
                | Self::MaxKw
        )
    }

    /// Tokens that can stand for a property or segment name.
    ///
    /// Keywords are reserved only where an operator may appear, so a property
    /// called `desc` is still addressable after a `/`.
    pub fn is_name(&self) -> bool {
        *self == Self::Ident || self.is_keyword()
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Integer
                | Self::Decimal
                | Self::NonFinite
                | Self::Date
                | Self::DateTimeOffset
                | Self::TimeOfDay
                | Self::Guid
                | Self::Duration
                | Self::Geo
                | Self::TrueKw
                | Self::FalseKw
                | Self::NullKw
        )
    }

    /// Human-readable spelling for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Error => "invalid character",
            Self::String => "string literal",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::NonFinite => "non-finite number",
            Self::Date => "date",
            Self::DateTimeOffset => "date-time-offset",
            Self::TimeOfDay => "time of day",
            Self::Guid => "guid",
            Self::Duration => "duration",
            Self::Geo => "spatial literal",
            Self::Ident => "identifier",
            Self::SystemName => "system name",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Slash => "'/'",
            Self::Eq => "'='",
            Self::Dot => "'.'",
            Self::Star => "'*'",
            Self::Minus => "'-'",
            _ => "keyword",
        }
    }
}
