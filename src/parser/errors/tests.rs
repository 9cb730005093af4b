//! Integration tests for the errors module

use super::*;
use crate::parser::parse_expression;

#[test]
fn test_error_module_exports() {
    let _code = ErrorCode::E0901;
    let _context = ParseContext::ResourcePath;
}

#[test]
fn test_error_carries_unparsed_remainder() {
    let err = parse_expression("Name eq 'a' )").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0202);
    assert_eq!(err.fragment, ")");
}

#[test]
fn test_error_range_points_at_offending_token() {
    let err = parse_expression("Price add").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0406);
    assert_eq!(u32::from(err.range.start()), 9);
}

#[test]
fn test_unknown_function_has_code() {
    let err = parse_expression("lenght(Name) eq 3").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0403);
    assert!(err.message.contains("lenght"));
}
