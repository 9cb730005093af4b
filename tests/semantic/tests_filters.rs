//! `$filter`, `$orderby`, `$select` and `$expand` checked against the model.

use odata::edm::PrimitiveKind;
use odata::parser::parse_expression;
use odata::semantic::Resolver;
use odata::syntax::QueryOption;
use odata::{Error, ResolveError, TargetType};
use rstest::rstest;

use crate::helpers::{MODEL, parse};

fn type_of(filter: &str, it: &str) -> Result<TargetType, ResolveError> {
    let expr = parse_expression(filter).unwrap();
    Resolver::new(&*MODEL).resolve_expression(&expr, &TargetType::collection(it))
}

#[rstest]
#[case("Price add 5 gt 10")]
#[case("Name eq 'x' or Price le 20")]
#[case("not (Released eq null)")]
#[case("Released lt 2024-01-01")]
#[case("Category/Name eq 'Books'")]
#[case("contains(tolower(Name), 'pen') and length(Name) gt 3")]
#[case("Warranty ge duration'P30D'")]
#[case("year(Released) eq 2020")]
#[case("Category/Products/any(p: p/Price gt Price)")]
#[case("Category/Products/all(p: p/Id ne 0)")]
#[case("Category/Products/$count gt 1")]
#[case("$it/Price eq $root/Products(1)/Price")]
#[case("round(Price) eq 4")]
#[case("Price lt INF")]
#[case("Price gt -INF and Price ne NaN")]
fn test_product_filters(#[case] filter: &str) {
    let ty = type_of(filter, "Shop.Model.Product").unwrap();
    assert_eq!(ty, TargetType::primitive(PrimitiveKind::Boolean), "{filter}");
}

#[rstest]
#[case("Status eq Shop.Model.Status'Open'")]
#[case("Status ne Shop.Status'Closed'")]
#[case("Placed gt 2024-01-01T00:00:00Z")]
#[case("Lines/any(l: l/Quantity gt 2 and l/Product/Price lt 10)")]
#[case("Customer/Shop.Model.VipCustomer/Discount gt 0.1")]
fn test_order_filters(#[case] filter: &str) {
    assert!(type_of(filter, "Shop.Model.Order").is_ok(), "{filter}");
}

#[test]
fn test_arithmetic_result_types() {
    let ty = type_of("Price mul 2", "Shop.Model.Product").unwrap();
    assert_eq!(ty, TargetType::primitive(PrimitiveKind::Decimal));

    let ty = type_of("Placed sub Placed", "Shop.Model.Order").unwrap();
    assert_eq!(ty, TargetType::primitive(PrimitiveKind::Duration));
}

#[rstest]
#[case("Name eq 1")]
#[case("Price and true")]
#[case("Name add 1 gt 0")]
#[case("startswith(Price, 'a')")]
#[case("Category/Products/any(p: p/Name)")]
#[case("Price eq 'cheap'")]
#[case("Name eq INF")]
fn test_mismatched_filters(#[case] filter: &str) {
    let err = type_of(filter, "Shop.Model.Product").unwrap_err();
    assert!(matches!(err, ResolveError::TypeMismatch { .. }), "{filter}: {err:?}");
}

#[test]
fn test_unknown_enum_member() {
    let err = type_of("Status eq Shop.Model.Status'Lost'", "Shop.Model.Order").unwrap_err();
    assert!(matches!(err, ResolveError::UnknownEnumMember { .. }), "{err:?}");
}

#[test]
fn test_unknown_lambda_variable() {
    let err = type_of("Category/Products/any(p: q/Price gt 1)", "Shop.Model.Product").unwrap_err();
    assert!(matches!(err, ResolveError::UnknownLambdaVariable { .. } | ResolveError::UnknownProperty { .. }));
}

#[test]
fn test_filter_through_uri() {
    let uri = parse("Products?$filter=Price%20gt%205&$orderby=Name%20desc&$top=3").unwrap();
    let names: Vec<_> = uri.options().iter().map(QueryOption::name).collect();
    assert_eq!(names, vec!["$filter", "$orderby", "$top"]);
}

#[rstest]
#[case("Products?$filter=Colour eq 'red'")]
#[case("Products(1)?$filter=Price gt 1")]
#[case("Products?$orderby=Category")]
#[case("Products?$select=Colour")]
#[case("Products?$expand=Name")]
#[case("Customers?$expand=Orders($top=1;$expand=Customer($top=1))")]
fn test_rejected_options(#[case] uri: &str) {
    let err = parse(uri).unwrap_err();
    assert!(err.is_resolution(), "{uri}: {err:?}");
}

#[rstest]
#[case("Customers?$select=Name,Address/City,Shop.Model.VipCustomer/Discount")]
#[case("Customers?$expand=Orders($filter=Status eq Shop.Model.Status'Open';$select=Placed;$orderby=Placed desc)")]
#[case("Customers?$expand=Orders/$count,Orders/$ref")]
#[case("Categories?$expand=Products($expand=Category($levels=max))")]
#[case("Orders/$count?$filter=Id gt 10")]
fn test_accepted_options(#[case] uri: &str) {
    if let Err(err) = parse(uri) {
        panic!("{uri}: {err}");
    }
}

#[test]
fn test_options_after_count() {
    let err = parse("Orders/$count?$top=1").unwrap_err();
    assert!(matches!(err, Error::Resolve(ResolveError::OptionNotApplicable { .. })), "{err:?}");
}
