//! Resource path parsing
//!
//! ```text
//! ResourcePath = ['/'] Segment ('/' Segment)* ['/']
//! Segment      = '$ref' | '$value' | '$count'
//!              | QualifiedName [SegmentArgs [KeyPredicate]]
//! SegmentArgs  = '(' ')' | '(' Literal ')' | '(' Name '=' Literal (',' Name '=' Literal)* ')'
//! ```
//!
//! Whether a name is an entity set, a navigation property or an operation,
//! and so whether its arguments are a key or parameters, is left to the
//! resolver.

use super::primary::{parse_literal, parse_qualified_name};
use super::{ExpressionParser, unexpected};
use crate::base::Name;
use crate::base::constants::{COUNT, REF, VALUE};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::lexer::TokenKind;
use crate::syntax::{KeyPredicate, RawPath, RawSegment, SegmentArgs};

pub fn parse_resource_path<P: ExpressionParser>(p: &mut P) -> Result<RawPath, SyntaxError> {
    let mut path = RawPath::default();
    p.eat(TokenKind::Slash);
    while !p.at_eof() {
        path.segments.push(parse_segment(p)?);
        if p.at(TokenKind::LParen) {
            // `Fn(p=1)(4)`: a key into the collection an operation returned
            path.segments.push(RawSegment::Key(parse_key_predicate(p)?));
        }
        if p.at_eof() {
            break;
        }
        if !p.eat(TokenKind::Slash) {
            return Err(match p.current_kind() {
                Some(TokenKind::RParen) => p.error(ErrorCode::E0202, "unexpected ')'"),
                _ => unexpected(p, "'/' between path segments").in_context(ParseContext::ResourcePath),
            });
        }
    }
    Ok(path)
}

fn parse_segment<P: ExpressionParser>(p: &mut P) -> Result<RawSegment, SyntaxError> {
    if p.at(TokenKind::SystemName) {
        let segment = match p.current_text() {
            REF => RawSegment::Ref,
            VALUE => RawSegment::Value,
            COUNT => RawSegment::Count,
            other => {
                return Err(p.error(ErrorCode::E0301, format!("'{other}' is not a path segment")));
            }
        };
        p.bump();
        return Ok(segment);
    }
    if !p.at_name_token() {
        return Err(match p.current_kind() {
            Some(TokenKind::Slash) => p.error(ErrorCode::E0301, "empty path segment"),
            _ => unexpected(p, "segment name").in_context(ParseContext::ResourcePath),
        });
    }
    let name = parse_qualified_name(p)?;
    let args = if p.at(TokenKind::LParen) {
        Some(parse_segment_args(p)?)
    } else {
        None
    };
    Ok(RawSegment::Named { name, args })
}

/// Parse the parenthesized arguments following a segment name.
pub fn parse_segment_args<P: ExpressionParser>(p: &mut P) -> Result<SegmentArgs, SyntaxError> {
    p.expect(TokenKind::LParen, ErrorCode::E0302)?;
    if p.eat(TokenKind::RParen) {
        return Ok(SegmentArgs::Empty);
    }

    let args = if p.at_name_token() && p.peek_kind(1) == Some(TokenKind::Eq) {
        let mut pairs: Vec<(Name, _)> = Vec::new();
        loop {
            if !p.at_name_token() {
                return Err(unexpected(p, "name=value").in_context(ParseContext::KeyPredicate));
            }
            let name = Name::new(p.current_text());
            if pairs.iter().any(|(n, _)| *n == name) {
                return Err(p.error(ErrorCode::E0303, format!("'{name}' is given more than once")));
            }
            p.bump();
            p.expect(TokenKind::Eq, ErrorCode::E0302)?;
            let value = parse_literal(p)?;
            pairs.push((name, value));
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        SegmentArgs::Named(pairs)
    } else {
        SegmentArgs::Single(parse_literal(p).map_err(|e| e.in_context(ParseContext::KeyPredicate))?)
    };

    if !p.eat(TokenKind::RParen) {
        return Err(if p.at_eof() {
            p.error(ErrorCode::E0201, "unclosed '(' in key predicate")
        } else {
            p.error(
                ErrorCode::E0302,
                format!("expected ',' or ')', found '{}'", p.current_text()),
            )
        });
    }
    Ok(args)
}

/// Parse a key predicate: `(1)` or `(k1=1,k2='a')`.
pub fn parse_key_predicate<P: ExpressionParser>(p: &mut P) -> Result<KeyPredicate, SyntaxError> {
    let range = p.current_range();
    parse_segment_args(p)?
        .into_key()
        .ok_or_else(|| SyntaxError::new("empty key predicate", range, ErrorCode::E0302))
}
