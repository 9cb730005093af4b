//! Expression parsing for `$filter`, `$orderby` and lambda predicates
//!
//! This module implements the precedence chain, loosest first:
//!
//! ```text
//! Expression → OrExpression → AndExpression → NotExpression
//!     → ComparisonExpression → AdditiveExpression
//!     → MultiplicativeExpression → UnaryExpression → PrimaryExpression
//! ```
//!
//! Logical and arithmetic operators are left-associative; a comparison takes
//! exactly two operands, so `a eq b eq c` is rejected. `not` binds looser than the
//! comparison operators, so `not Price gt 5` negates the comparison.

use super::primary::parse_primary_expression;
use super::{ExpressionParser, nested, unexpected};
use crate::parser::errors::{ErrorCode, SyntaxError};
use crate::parser::lexer::TokenKind;
use crate::syntax::{ArithmeticOp, ComparisonOp, Expr};

/// Parse a complete expression.
/// Entry point for all expressions, including parenthesized sub-expressions.
pub fn parse_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    nested(p, parse_or_expression)
}

/// OrExpression = AndExpression ('or' AndExpression)*
pub fn parse_or_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let mut left = parse_and_expression(p)?;
    while p.eat(TokenKind::OrKw) {
        let right = parse_and_expression(p)?;
        left = Expr::or(left, right);
    }
    Ok(left)
}

/// AndExpression = NotExpression ('and' NotExpression)*
pub fn parse_and_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let mut left = parse_not_expression(p)?;
    while p.eat(TokenKind::AndKw) {
        let right = parse_not_expression(p)?;
        left = Expr::and(left, right);
    }
    Ok(left)
}

/// NotExpression = 'not' NotExpression | ComparisonExpression
pub fn parse_not_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    if p.eat(TokenKind::NotKw) {
        let operand = nested(p, parse_not_expression)?;
        return Ok(Expr::not(operand));
    }
    parse_comparison_expression(p)
}

fn comparison_op(kind: TokenKind) -> Option<ComparisonOp> {
    Some(match kind {
        TokenKind::EqKw => ComparisonOp::Eq,
        TokenKind::NeKw => ComparisonOp::Ne,
        TokenKind::GtKw => ComparisonOp::Gt,
        TokenKind::GeKw => ComparisonOp::Ge,
        TokenKind::LtKw => ComparisonOp::Lt,
        TokenKind::LeKw => ComparisonOp::Le,
        _ => return None,
    })
}

/// ComparisonExpression = AdditiveExpression [ComparisonOp AdditiveExpression]
pub fn parse_comparison_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let left = parse_additive_expression(p)?;
    let Some(op) = p.current_kind().and_then(comparison_op) else {
        return Ok(left);
    };
    p.bump();
    let right = parse_additive_expression(p)?;
    if p.current_kind().and_then(comparison_op).is_some() {
        return Err(p.error(
            ErrorCode::E0401,
            format!("comparison operators do not chain, found '{}'", p.current_text()),
        ));
    }
    Ok(Expr::comparison(op, left, right))
}

/// AdditiveExpression = MultiplicativeExpression (('add' | 'sub') MultiplicativeExpression)*
pub fn parse_additive_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let mut left = parse_multiplicative_expression(p)?;
    loop {
        let op = match p.current_kind() {
            Some(TokenKind::AddKw) => ArithmeticOp::Add,
            Some(TokenKind::SubKw) => ArithmeticOp::Sub,
            _ => break,
        };
        p.bump();
        let right = parse_multiplicative_expression(p)?;
        left = Expr::arithmetic(op, left, right);
    }
    Ok(left)
}

/// MultiplicativeExpression = UnaryExpression (('mul' | 'div' | 'mod') UnaryExpression)*
pub fn parse_multiplicative_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let mut left = parse_unary_expression(p)?;
    loop {
        let op = match p.current_kind() {
            Some(TokenKind::MulKw) => ArithmeticOp::Mul,
            Some(TokenKind::DivKw) => ArithmeticOp::Div,
            Some(TokenKind::ModKw) => ArithmeticOp::Mod,
            _ => break,
        };
        p.bump();
        let right = parse_unary_expression(p)?;
        left = Expr::arithmetic(op, left, right);
    }
    Ok(left)
}

/// UnaryExpression = '-' UnaryExpression | PrimaryExpression
pub fn parse_unary_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    if p.eat(TokenKind::Minus) {
        if p.at_eof() {
            return Err(unexpected(p, "operand after '-'"));
        }
        let operand = nested(p, parse_unary_expression)?;
        return Ok(Expr::Negate(Box::new(operand)));
    }
    parse_primary_expression(p)
}
