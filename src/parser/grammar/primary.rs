//! Primary expressions: literals, `( ... )`, function calls and paths
//!
//! ```text
//! PrimaryExpression = Literal
//!                   | '(' Expression ')'
//!                   | FunctionName '(' [Expression (',' Expression)*] ')'
//!                   | '$it' PathTail | '$root' '/' EntitySet [KeyPredicate] PathTail
//!                   | Name PathTail
//! PathTail          = ('/' (Name | QualifiedTypeName | '$count' | Lambda))*
//! Lambda            = ('any' | 'all') '(' [Variable ':' Expression] ')'
//! ```

use text_size::TextRange;

use super::expressions::parse_expression;
use super::resource_path::parse_key_predicate;
use super::{ExpressionParser, nested, unexpected};
use crate::base::Name;
use crate::base::constants::{COUNT, IT, ROOT};
use crate::edm::PrimitiveKind;
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::lexer::TokenKind;
use crate::syntax::literal::{
    parse_boolean, parse_date, parse_date_time_offset, parse_guid, parse_number, parse_string,
    parse_time_of_day,
};
use crate::syntax::{EntityRoot, EnumLiteral, Expr, GeoLiteral, Lambda, Literal, Method, PathExpr};

pub fn parse_primary_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let Some(kind) = p.current_kind() else {
        return Err(unexpected(p, "expression"));
    };

    if kind.is_literal() || at_enum_literal(&*p) {
        return parse_literal(p).map(Expr::Literal);
    }

    match kind {
        TokenKind::LParen => {
            p.bump();
            let inner = parse_expression(p)?;
            p.expect(TokenKind::RParen, ErrorCode::E0201)?;
            Ok(inner)
        }
        TokenKind::SystemName => parse_entity_path(p).map(Expr::Path),
        _ if p.at_name_token() => parse_name_expression(p),
        TokenKind::RParen => Err(p.error(ErrorCode::E0202, "unexpected ')'")),
        _ => Err(unexpected(p, "expression")),
    }
}

// =============================================================================
// Literals
// =============================================================================

/// Parse the current literal token into a typed value.
///
/// The token shape decides the primitive kind; malformed values (an invalid
/// date such as `2024-02-30`, an integer with 30 digits) fail here.
pub fn parse_literal<P: ExpressionParser>(p: &mut P) -> Result<Literal, SyntaxError> {
    if at_enum_literal(&*p) {
        return parse_enum_literal(p);
    }
    let Some(kind) = p.current_kind().filter(|k| k.is_literal()) else {
        return Err(unexpected(p, "literal"));
    };
    let raw = p.current_text();
    let literal = match kind {
        TokenKind::NullKw => Ok(Literal::Null),
        TokenKind::TrueKw | TokenKind::FalseKw => parse_boolean(raw).map(Literal::Boolean),
        TokenKind::String => parse_string(raw).map(Literal::String),
        TokenKind::Integer | TokenKind::Decimal => parse_number(raw).map(Literal::Number),
        TokenKind::NonFinite => Literal::parse(raw, PrimitiveKind::Double),
        TokenKind::Date => parse_date(raw).map(Literal::Date),
        TokenKind::DateTimeOffset => parse_date_time_offset(raw).map(Literal::DateTimeOffset),
        TokenKind::TimeOfDay => parse_time_of_day(raw).map(Literal::TimeOfDay),
        TokenKind::Guid => parse_guid(raw).map(Literal::Guid),
        TokenKind::Duration => Literal::parse(raw, PrimitiveKind::Duration),
        TokenKind::Geo => GeoLiteral::parse(raw).map(Literal::Geo),
        _ => return Err(unexpected(p, "literal")),
    };
    let literal = literal.map_err(|err| {
        SyntaxError::from_literal(err, p.current_range()).with_fragment(raw)
    })?;
    p.bump();
    Ok(literal)
}

/// `Namespace.Type'Member'`: a dotted name with the string glued to it, no
/// whitespace anywhere in between.
fn at_enum_literal<P: ExpressionParser>(p: &P) -> bool {
    let mut end = p.current_range().start();
    let mut dots = 0;
    for n in 0.. {
        let (Some(kind), Some(range)) = (p.peek_kind(n), p.peek_range(n)) else {
            return false;
        };
        if range.start() != end {
            return false;
        }
        end = range.end();
        match kind {
            k if n % 2 == 0 && k.is_name() => {}
            TokenKind::Dot if n % 2 == 1 => dots += 1,
            TokenKind::String if n % 2 == 1 => return dots > 0,
            _ => return false,
        }
    }
    false
}

fn parse_enum_literal<P: ExpressionParser>(p: &mut P) -> Result<Literal, SyntaxError> {
    let start = p.current_range().start();
    let mut raw = String::new();
    loop {
        let Some(kind) = p.current_kind() else {
            return Err(unexpected(p, "enum literal"));
        };
        raw.push_str(p.current_text());
        let end = p.current_range().end();
        p.bump();
        if kind == TokenKind::String {
            return EnumLiteral::parse(&raw).map(Literal::Enum).map_err(|err| {
                SyntaxError::from_literal(err, TextRange::new(start, end)).with_fragment(raw.as_str())
            });
        }
    }
}

// =============================================================================
// Names, function calls and paths
// =============================================================================

/// Parse `Name ('.' Name)*`.
pub fn parse_qualified_name<P: ExpressionParser>(p: &mut P) -> Result<Name, SyntaxError> {
    if !p.at_name_token() {
        return Err(unexpected(p, "name"));
    }
    let mut name = p.current_text().to_string();
    p.bump();
    while p.at(TokenKind::Dot) {
        p.bump();
        if !p.at_name_token() {
            return Err(unexpected(p, "name after '.'"));
        }
        name.push('.');
        name.push_str(p.current_text());
        p.bump();
    }
    Ok(Name::new(name))
}

fn parse_name_expression<P: ExpressionParser>(p: &mut P) -> Result<Expr, SyntaxError> {
    let start = p.current_range();
    let name = parse_qualified_name(p)?;

    if p.at(TokenKind::LParen) {
        let Some(method) = Method::from_name(&name) else {
            let err = SyntaxError::new(format!("unknown function '{name}'"), start, ErrorCode::E0403);
            return Err(match Method::from_name(&name.to_ascii_lowercase()) {
                Some(m) => err.with_hint(format!("function names are case-sensitive, use '{m}'")),
                None => err,
            });
        };
        return parse_method_call(p, method);
    }

    let head = if p.lambda_variables().contains(&name) {
        PathExpr::LambdaVariable { name, sub_path: None }
    } else if name.contains('.') {
        PathExpr::TypeCast { type_name: name, sub_path: None }
    } else {
        PathExpr::property(name)
    };
    parse_path_tail(p, head).map(Expr::Path)
}

fn parse_method_call<P: ExpressionParser>(p: &mut P, method: Method) -> Result<Expr, SyntaxError> {
    let open = p.current_range();
    p.bump(); // (
    let args = nested(p, |p| {
        let mut args = Vec::new();
        if !p.at(TokenKind::RParen) {
            loop {
                args.push(parse_expression(p)?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        if !p.eat(TokenKind::RParen) {
            return Err(if p.at_eof() {
                p.error(ErrorCode::E0404, format!("unclosed call to '{method}'"))
            } else {
                unexpected(p, "',' or ')'").in_context(ParseContext::MethodArguments)
            });
        }
        Ok(args)
    })?;

    let arity = method.arity();
    if !arity.contains(&args.len()) {
        let expected = if arity.start() == arity.end() {
            arity.start().to_string()
        } else {
            format!("{} to {}", arity.start(), arity.end())
        };
        return Err(SyntaxError::new(
            format!("'{method}' takes {expected} argument(s), found {}", args.len()),
            open,
            ErrorCode::E0409,
        ));
    }
    Ok(Expr::call(method, args))
}

/// `$it` or `$root/EntitySet(key)`, followed by a path tail.
fn parse_entity_path<P: ExpressionParser>(p: &mut P) -> Result<PathExpr, SyntaxError> {
    let text = p.current_text().to_string();
    let head = if text == IT {
        p.bump();
        PathExpr::Entity { root: EntityRoot::It, sub_path: None }
    } else if text == ROOT {
        p.bump();
        p.expect(TokenKind::Slash, ErrorCode::E0902)?;
        if !p.at_name_token() {
            return Err(unexpected(p, "entity set name after '$root/'"));
        }
        let entity_set = Name::new(p.current_text());
        p.bump();
        let key = if p.at(TokenKind::LParen) {
            Some(parse_key_predicate(p)?)
        } else {
            None
        };
        PathExpr::Entity {
            root: EntityRoot::Root { entity_set, key },
            sub_path: None,
        }
    } else {
        return Err(p.error(ErrorCode::E0401, format!("'{text}' is not allowed in an expression")));
    };
    parse_path_tail(p, head)
}

/// Continue `head` through `/`-separated segments.
fn parse_path_tail<P: ExpressionParser>(p: &mut P, mut head: PathExpr) -> Result<PathExpr, SyntaxError> {
    while p.at(TokenKind::Slash) {
        p.bump();
        let segment = match p.current_kind() {
            Some(TokenKind::AnyKw | TokenKind::AllKw) if p.peek_kind(1) == Some(TokenKind::LParen) => {
                parse_lambda(p)?
            }
            Some(TokenKind::SystemName) if p.current_text() == COUNT => {
                p.bump();
                PathExpr::Count
            }
            _ if p.at_name_token() => {
                let name = parse_qualified_name(p)?;
                if name.contains('.') {
                    PathExpr::TypeCast { type_name: name, sub_path: None }
                } else {
                    PathExpr::property(name)
                }
            }
            _ => return Err(unexpected(p, "path segment after '/'")),
        };
        let terminal = matches!(segment, PathExpr::Any { .. } | PathExpr::All { .. } | PathExpr::Count);
        head.append(segment);
        if terminal {
            break;
        }
    }
    Ok(head)
}

/// `any()`, `any(v: predicate)` or `all(v: predicate)`.
fn parse_lambda<P: ExpressionParser>(p: &mut P) -> Result<PathExpr, SyntaxError> {
    let is_all = p.at(TokenKind::AllKw);
    p.bump();
    p.bump(); // (

    if p.at(TokenKind::RParen) {
        if is_all {
            return Err(p
                .error(ErrorCode::E0405, "'all' requires a lambda variable and predicate")
                .with_hint("write all(x: <predicate>)"));
        }
        p.bump();
        return Ok(PathExpr::Any { lambda: None });
    }

    if p.current_kind() != Some(TokenKind::Ident) {
        return Err(p.error(ErrorCode::E0405, "expected lambda variable").in_context(ParseContext::Lambda));
    }
    let variable = Name::new(p.current_text());
    if p.lambda_variables().contains(&variable) {
        return Err(p.error(
            ErrorCode::E0408,
            format!("lambda variable '{variable}' is already defined"),
        ));
    }
    p.bump();
    if !p.eat(TokenKind::Colon) {
        return Err(p
            .error(ErrorCode::E0405, "expected ':' after lambda variable")
            .in_context(ParseContext::Lambda));
    }

    p.push_lambda_variable(variable.clone());
    let predicate = parse_expression(p);
    p.pop_lambda_variable();
    let predicate = predicate?;
    p.expect(TokenKind::RParen, ErrorCode::E0201)?;

    let lambda = Lambda {
        variable,
        predicate: Box::new(predicate),
    };
    Ok(if is_all {
        PathExpr::All { lambda }
    } else {
        PathExpr::Any { lambda: Some(lambda) }
    })
}
