//! Query option grammar and the literal forms used in keys and filters.

use odata::ParserConfig;
use odata::parser::{
    ErrorCode, parse_expand, parse_key_predicate, parse_literal, parse_orderby, parse_query_options,
    parse_select,
};
use odata::syntax::{
    ExpandKind, ExpandTarget, KeyPredicate, Levels, Literal, QueryOption, SelectItem, SortDirection,
};
use odata::Error;
use rstest::rstest;
use rust_decimal::Decimal;

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_select_paths() {
    let items = parse_select("Name,Address/City,*").unwrap();
    assert_eq!(items.len(), 3);
    assert!(matches!(&items[1], SelectItem::Path(path) if path.len() == 2));
    assert_eq!(items[2], SelectItem::All);
}

#[test]
fn test_orderby_directions() {
    let items = parse_orderby("Name desc,Price,Id asc").unwrap();
    let directions: Vec<_> = items.iter().map(|i| i.direction).collect();
    assert_eq!(directions, vec![SortDirection::Desc, SortDirection::Asc, SortDirection::Asc]);
}

#[test]
fn test_expand_with_nested_options() {
    let items = parse_expand("Orders($filter=Id gt 1;$top=2;$expand=Lines($levels=max)),Customer/$ref").unwrap();
    assert_eq!(items.len(), 2);

    let orders = &items[0];
    assert!(matches!(&orders.target, ExpandTarget::Path(path) if path[0].as_str() == "Orders"));
    assert!(orders.options.filter.is_some());
    assert_eq!(orders.options.top, Some(2));
    let nested = orders.options.expand.as_ref().unwrap();
    assert_eq!(nested[0].options.levels, Some(Levels::Max));

    assert_eq!(items[1].kind, ExpandKind::Ref);
    assert!(items[1].options.is_empty());
}

#[test]
fn test_expand_star() {
    let items = parse_expand("*").unwrap();
    assert_eq!(items[0].target, ExpandTarget::All);
}

#[test]
fn test_options_keep_request_order() {
    let config = ParserConfig::default();
    let options = parse_query_options(
        &pairs(&[("$skip", "10"), ("trace", "on"), ("$top", "5"), ("$count", "true")]),
        &config,
    )
    .unwrap();
    assert_eq!(options[0], QueryOption::Skip(10));
    assert_eq!(
        options[1],
        QueryOption::Custom {
            name: "trace".into(),
            value: "on".into()
        }
    );
    assert_eq!(options[2], QueryOption::Top(5));
    assert_eq!(options[3], QueryOption::Count(true));
}

#[rstest]
#[case(&[("$top", "1"), ("$top", "2")], ErrorCode::E0502)]
#[case(&[("$bogus", "1")], ErrorCode::E0501)]
#[case(&[("$top", "ten")], ErrorCode::E0503)]
#[case(&[("$filter", "")], ErrorCode::E0503)]
fn test_invalid_options(#[case] input: &[(&str, &str)], #[case] code: ErrorCode) {
    let err = parse_query_options(&pairs(input), &ParserConfig::default()).unwrap_err();
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(err.code, code);
}

#[test]
fn test_dollar_prefix_is_optional_when_enabled() {
    let config = ParserConfig::default().with_optional_dollar_prefix(true);
    let options = parse_query_options(&pairs(&[("top", "3")]), &config).unwrap();
    assert_eq!(options, vec![QueryOption::Top(3)]);

    let options = parse_query_options(&pairs(&[("top", "3")]), &ParserConfig::default()).unwrap();
    assert!(matches!(&options[0], QueryOption::Custom { .. }));
}

#[test]
fn test_unknown_format_lists_supported() {
    let err = parse_query_options(&pairs(&[("$format", "superman")]), &ParserConfig::default()).unwrap_err();
    match err {
        Error::UnsupportedFormat { requested, supported } => {
            assert_eq!(requested, "superman");
            assert!(supported.iter().any(|s| s == "json"));
        }
        other => panic!("expected an unsupported format error, got {other:?}"),
    }
}

#[test]
fn test_key_predicates() {
    let key = parse_key_predicate("(1)").unwrap();
    assert_eq!(key, KeyPredicate::Single(Literal::Number(Decimal::from(1))));

    let key = parse_key_predicate("(k1=1,k2='a')").unwrap();
    assert_eq!(key.len(), 2);
    assert_eq!(key.get("k2"), Some(&Literal::String("a".into())));
    assert_eq!(key.to_string(), "(k1=1,k2='a')");
}

#[test]
fn test_duplicate_key_names() {
    let err = parse_key_predicate("(k1=1,k1=2)").unwrap_err();
    assert_eq!(err.code, ErrorCode::E0303);
}

#[rstest]
#[case("'it''s'", Literal::String("it's".into()))]
#[case("true", Literal::Boolean(true))]
#[case("null", Literal::Null)]
#[case("-12", Literal::Number(Decimal::from(-12)))]
fn test_simple_literals(#[case] input: &str, #[case] expected: Literal) {
    assert_eq!(parse_literal(input).unwrap(), expected);
}

#[rstest]
#[case("2024-02-30")]
#[case("25:00")]
#[case("duration'1D'")]
#[case("geography'POINT(1)'")]
fn test_malformed_literals(#[case] input: &str) {
    let err = parse_literal(input).unwrap_err();
    assert_eq!(err.code, ErrorCode::E0601);
}
