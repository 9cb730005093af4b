//! Grammar for the structured system query options
//!
//! ```text
//! Select     = SelectItem (',' SelectItem)*
//! SelectItem = '*' | QualifiedName ('/' QualifiedName)*
//! OrderBy    = Expression ['asc' | 'desc'] (',' Expression ['asc' | 'desc'])*
//! Expand     = ExpandItem (',' ExpandItem)*
//! ExpandItem = ('*' | QualifiedName ('/' QualifiedName)*) ['/$ref' | '/$count']
//!              ['(' ExpandOption (';' ExpandOption)* ')']
//! ```
//!
//! `$filter`, `$top` and the other single-valued options are parsed by the
//! caller; the rules here also serve the options nested inside `$expand`.

use super::expressions::parse_expression;
use super::primary::parse_qualified_name;
use super::{ExpressionParser, nested, unexpected};
use crate::base::Name;
use crate::base::constants::{COUNT, EXPAND, FILTER, LEVELS, ORDERBY, REF, SELECT, SKIP, TOP};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::lexer::TokenKind;
use crate::syntax::{
    ExpandItem, ExpandKind, ExpandOptions, ExpandTarget, Levels, OrderByItem, SelectItem,
    SortDirection,
};

// =============================================================================
// $select
// =============================================================================

pub fn parse_select_items<P: ExpressionParser>(p: &mut P) -> Result<Vec<SelectItem>, SyntaxError> {
    let mut items = Vec::new();
    loop {
        let item = if p.eat(TokenKind::Star) {
            SelectItem::All
        } else if p.at_name_token() {
            SelectItem::Path(parse_name_path(p)?)
        } else {
            return Err(unexpected(p, "property name or '*'").in_context(ParseContext::Select));
        };
        items.push(item);
        if !p.eat(TokenKind::Comma) {
            return Ok(items);
        }
    }
}

/// `Name ('/' Name)*`, stopping before a `/$ref` or `/$count` suffix.
fn parse_name_path<P: ExpressionParser>(p: &mut P) -> Result<Vec<Name>, SyntaxError> {
    let mut names = vec![parse_qualified_name(p)?];
    while p.at(TokenKind::Slash) && p.peek_kind(1) != Some(TokenKind::SystemName) {
        p.bump();
        names.push(parse_qualified_name(p)?);
    }
    Ok(names)
}

// =============================================================================
// $orderby
// =============================================================================

pub fn parse_orderby_items<P: ExpressionParser>(p: &mut P) -> Result<Vec<OrderByItem>, SyntaxError> {
    let mut items = Vec::new();
    loop {
        if p.at_eof() {
            return Err(unexpected(p, "sort expression").in_context(ParseContext::OrderBy));
        }
        let expr = parse_expression(p)?;
        let direction = if p.eat(TokenKind::DescKw) {
            SortDirection::Desc
        } else {
            p.eat(TokenKind::AscKw);
            SortDirection::Asc
        };
        items.push(OrderByItem { expr, direction });
        if !p.eat(TokenKind::Comma) {
            return Ok(items);
        }
    }
}

// =============================================================================
// $expand
// =============================================================================

pub fn parse_expand_items<P: ExpressionParser>(p: &mut P) -> Result<Vec<ExpandItem>, SyntaxError> {
    let mut items = Vec::new();
    loop {
        items.push(parse_expand_item(p)?);
        if !p.eat(TokenKind::Comma) {
            return Ok(items);
        }
    }
}

fn parse_expand_item<P: ExpressionParser>(p: &mut P) -> Result<ExpandItem, SyntaxError> {
    let target = if p.eat(TokenKind::Star) {
        ExpandTarget::All
    } else if p.at_name_token() {
        ExpandTarget::Path(parse_name_path(p)?)
    } else {
        return Err(unexpected(p, "navigation property or '*'").in_context(ParseContext::Expand));
    };

    let mut kind = ExpandKind::Entities;
    if p.at(TokenKind::Slash) {
        p.bump();
        kind = match p.current_text() {
            REF if p.at(TokenKind::SystemName) => ExpandKind::Ref,
            COUNT if p.at(TokenKind::SystemName) => ExpandKind::Count,
            _ => return Err(unexpected(p, "'$ref' or '$count'").in_context(ParseContext::Expand)),
        };
        p.bump();
    }

    let options = if p.at(TokenKind::LParen) {
        p.bump();
        let options = nested(p, parse_expand_options)?;
        p.expect(TokenKind::RParen, ErrorCode::E0201)?;
        options
    } else {
        ExpandOptions::default()
    };

    Ok(ExpandItem { target, kind, options })
}

const NESTED_OPTIONS: &[&str] = &[FILTER, SELECT, EXPAND, ORDERBY, TOP, SKIP, COUNT, LEVELS];

fn parse_expand_options<P: ExpressionParser>(p: &mut P) -> Result<ExpandOptions, SyntaxError> {
    let mut options = ExpandOptions::default();
    loop {
        if !p.at(TokenKind::SystemName) {
            return Err(unexpected(p, "nested query option").in_context(ParseContext::ExpandOptions));
        }
        let written = p.current_text().to_string();
        let Some(&name) = NESTED_OPTIONS.iter().find(|o| p.option_name_eq(&written, o)) else {
            return Err(p.error(
                ErrorCode::E0501,
                format!("'{written}' is not allowed inside $expand"),
            ));
        };
        let duplicate = p.error(ErrorCode::E0502, format!("'{name}' given more than once"));
        p.bump();
        p.expect(TokenKind::Eq, ErrorCode::E0902)?;

        let fresh = match name {
            FILTER => options.filter.replace(parse_expression(p)?).is_none(),
            SELECT => options.select.replace(parse_select_items(p)?).is_none(),
            EXPAND => options.expand.replace(parse_expand_items(p)?).is_none(),
            ORDERBY => options.order_by.replace(parse_orderby_items(p)?).is_none(),
            TOP => options.top.replace(parse_count_value(p, name)?).is_none(),
            SKIP => options.skip.replace(parse_count_value(p, name)?).is_none(),
            COUNT => options.count.replace(parse_bool_value(p)?).is_none(),
            _ => options.levels.replace(parse_levels(p)?).is_none(),
        };
        if !fresh {
            return Err(duplicate);
        }

        if !p.eat(TokenKind::Semicolon) {
            return Ok(options);
        }
    }
}

/// A non-negative integer, for `$top` and `$skip`.
fn parse_count_value<P: ExpressionParser>(p: &mut P, option: &str) -> Result<u64, SyntaxError> {
    let value = p
        .at(TokenKind::Integer)
        .then(|| p.current_text().parse::<u64>().ok())
        .flatten()
        .ok_or_else(|| {
            p.error(
                ErrorCode::E0503,
                format!("{option} expects a non-negative integer, found '{}'", p.current_text()),
            )
        })?;
    p.bump();
    Ok(value)
}

fn parse_bool_value<P: ExpressionParser>(p: &mut P) -> Result<bool, SyntaxError> {
    let value = match p.current_kind() {
        Some(TokenKind::TrueKw) => true,
        Some(TokenKind::FalseKw) => false,
        _ => return Err(p.error(ErrorCode::E0503, "$count expects true or false")),
    };
    p.bump();
    Ok(value)
}

fn parse_levels<P: ExpressionParser>(p: &mut P) -> Result<Levels, SyntaxError> {
    if p.eat(TokenKind::MaxKw) {
        return Ok(Levels::Max);
    }
    let depth = p
        .at(TokenKind::Integer)
        .then(|| p.current_text().parse::<u32>().ok())
        .flatten()
        .filter(|depth| *depth > 0)
        .ok_or_else(|| p.error(ErrorCode::E0503, "$levels expects a positive integer or 'max'"))?;
    p.bump();
    Ok(Levels::Depth(depth))
}
