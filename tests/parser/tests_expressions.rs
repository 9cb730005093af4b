//! Expression grammar: precedence, comparisons, lambdas and method calls.

use odata::parser::{ErrorCode, parse_expression};
use odata::syntax::{ArithmeticOp, ComparisonOp, Expr, Literal, Method, PathExpr};
use rstest::rstest;
use rust_decimal::Decimal;

fn prop(name: &str) -> Expr {
    Expr::Path(PathExpr::property(name))
}

fn num(value: i64) -> Expr {
    Expr::Literal(Literal::Number(Decimal::from(value)))
}

#[test]
fn test_arithmetic_binds_tighter_than_comparison() {
    let expr = parse_expression("id add 5 gt 10").unwrap();
    assert_eq!(
        expr,
        Expr::comparison(
            ComparisonOp::Gt,
            Expr::arithmetic(ArithmeticOp::Add, prop("id"), num(5)),
            num(10),
        )
    );
}

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    let expr = parse_expression("a add b mul 2").unwrap();
    assert_eq!(
        expr,
        Expr::arithmetic(
            ArithmeticOp::Add,
            prop("a"),
            Expr::arithmetic(ArithmeticOp::Mul, prop("b"), num(2)),
        )
    );
}

#[rstest]
#[case("eq", ComparisonOp::Eq)]
#[case("ne", ComparisonOp::Ne)]
#[case("gt", ComparisonOp::Gt)]
#[case("ge", ComparisonOp::Ge)]
#[case("lt", ComparisonOp::Lt)]
#[case("le", ComparisonOp::Le)]
fn test_comparison_operators(#[case] keyword: &str, #[case] op: ComparisonOp) {
    let expr = parse_expression(&format!("id {keyword} 20")).unwrap();
    assert_eq!(expr, Expr::comparison(op, prop("id"), num(20)));
}

#[rstest]
#[case("Name eq 'a' eq true")]
#[case("id lt 5 gt 1")]
#[case("id add 1 ne 2 eq false")]
fn test_comparisons_do_not_chain(#[case] input: &str) {
    assert_eq!(parse_expression(input).unwrap_err().code, ErrorCode::E0401);
}

#[test]
fn test_parenthesized_comparison_compares_again() {
    let expr = parse_expression("(Name eq 'a') eq true").unwrap();
    let Expr::Comparison { left, .. } = expr else { panic!("expected comparison") };
    assert!(matches!(*left, Expr::Comparison { .. }));
}

#[test]
fn test_dotted_names_and_enum_literals() {
    assert!(parse_expression("geo.distance(Location, geography'POINT(1 2)') lt 5").is_ok());
    let expr = parse_expression("Color eq Shop.Model.Color'Red'").unwrap();
    let Expr::Comparison { right, .. } = expr else { panic!("expected comparison") };
    assert!(matches!(*right, Expr::Literal(Literal::Enum(_))));
}

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse_expression("a eq 1 or b eq 2 and c eq 3").unwrap();
    let Expr::Or(left, right) = expr else {
        panic!("expected or at the top, got {expr:?}");
    };
    assert!(matches!(*left, Expr::Comparison { .. }));
    assert!(matches!(*right, Expr::And(_, _)));
}

#[test]
fn test_parentheses_override_precedence() {
    let expr = parse_expression("(a eq 1 or b eq 2) and c eq 3").unwrap();
    let Expr::And(left, _) = expr else {
        panic!("expected and at the top, got {expr:?}");
    };
    assert!(matches!(*left, Expr::Or(_, _)));
}

#[test]
fn test_not_applies_to_comparison() {
    let expr = parse_expression("not Name eq 'x'").unwrap();
    let Expr::Not(inner) = expr else {
        panic!("expected not, got {expr:?}");
    };
    assert!(matches!(*inner, Expr::Comparison { op: ComparisonOp::Eq, .. }));
}

#[test]
fn test_any_with_lambda() {
    let expr = parse_expression("Orders/any(o: o/Id gt 1)").unwrap();
    let Expr::Path(PathExpr::Property { name, sub_path: Some(next) }) = expr else {
        panic!("expected navigation path");
    };
    assert_eq!(name.as_str(), "Orders");
    let PathExpr::Any { lambda: Some(lambda) } = *next else {
        panic!("expected any with a lambda");
    };
    assert_eq!(lambda.variable.as_str(), "o");
    assert!(matches!(*lambda.predicate, Expr::Comparison { .. }));
}

#[test]
fn test_any_without_lambda() {
    let expr = parse_expression("Orders/any()").unwrap();
    let path = expr.as_path().unwrap();
    assert!(matches!(path.sub_path(), Some(PathExpr::Any { lambda: None })));
    assert!(path.is_terminated());
}

#[test]
fn test_all_requires_lambda() {
    let err = parse_expression("Orders/all()").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0405);
}

#[rstest]
#[case("contains(Name,'a')", Method::Contains)]
#[case("startswith(Name,'a')", Method::StartsWith)]
#[case("endswith(Name,'a')", Method::EndsWith)]
#[case("geo.intersects(Position,geography'POLYGON((0 0,1 0,1 1,0 0))')", Method::GeoIntersects)]
fn test_boolean_methods(#[case] input: &str, #[case] method: Method) {
    let expr = parse_expression(input).unwrap();
    let Expr::BoolMethodCall(call) = expr else {
        panic!("expected a boolean method call, got {expr:?}");
    };
    assert_eq!(call.method, method);
    assert_eq!(call.args.len(), 2);
}

#[rstest]
#[case("length(Name) gt 1", Method::Length)]
#[case("year(Released) eq 2024", Method::Year)]
#[case("round(Price) eq 2", Method::Round)]
#[case("substring(Name,1,2) eq 'ab'", Method::Substring)]
#[case("now() gt Placed", Method::Now)]
fn test_value_methods(#[case] input: &str, #[case] method: Method) {
    let expr = parse_expression(input).unwrap();
    let Expr::Comparison { left, right, .. } = expr else {
        panic!("expected a comparison");
    };
    let call = [left, right].into_iter().find_map(|side| match *side {
        Expr::MethodCall(call) => Some(call),
        _ => None,
    });
    assert_eq!(call.map(|c| c.method), Some(method));
}

#[rstest]
#[case("length()")]
#[case("length(Name,Name)")]
#[case("substring(Name)")]
#[case("substring(Name,1,2,3)")]
#[case("now(Name)")]
#[case("contains(Name)")]
fn test_method_arity(#[case] input: &str) {
    let err = parse_expression(input).unwrap_err();
    assert_eq!(err.code, ErrorCode::E0409);
}

#[test]
fn test_unknown_method() {
    let err = parse_expression("frobnicate(Name)").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0403);
}

#[rstest]
#[case("Name eq")]
#[case("eq 1")]
#[case("(Name eq 1")]
#[case("Name eq 1)")]
#[case("")]
fn test_malformed_expressions(#[case] input: &str) {
    assert!(parse_expression(input).is_err(), "{input:?} should not parse");
}

#[test]
fn test_error_carries_remaining_input() {
    let err = parse_expression("Name eq 1 Price").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0203);
    assert_eq!(err.fragment, "Price");

    let err = parse_expression("Name eq 1)").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0202);
}
