//! Resource path resolution against the shop model.

use odata::edm::{Edm, EntityContainer, PrimitiveKind, Schema, StructuredType};
use odata::syntax::{KeyPredicate, Literal};
use odata::{Error, ResolveError, Segment, TargetType, parse_resource_path};
use rstest::rstest;
use rust_decimal::Decimal;

use crate::helpers::parse_path;

fn resolve_error(path: &str) -> ResolveError {
    match parse_path(path) {
        Err(Error::Resolve(err)) => err,
        other => panic!("expected a resolution error for {path:?}, got {other:?}"),
    }
}

#[rstest]
#[case("Products", TargetType::collection("Shop.Model.Product"))]
#[case("Products(1)", TargetType::single("Shop.Model.Product"))]
#[case("Products(1)/Category", TargetType::single("Shop.Model.Category"))]
#[case("Categories(1)/Products(2)/Name", TargetType::primitive(PrimitiveKind::String))]
#[case("Customers('ALFKI')/Address/City", TargetType::primitive(PrimitiveKind::String))]
#[case("Customers('ALFKI')/Orders/$count", TargetType::primitive(PrimitiveKind::Int32))]
#[case("Customers/Shop.Model.VipCustomer", TargetType::collection("Shop.Model.VipCustomer"))]
#[case("Customers('A')/Shop.VipCustomer/Discount", TargetType::primitive(PrimitiveKind::Decimal))]
#[case("Orders(1)/Lines(k1=1,k2='a')/Product", TargetType::single("Shop.Model.Product"))]
#[case("Cheapest/Category/Products", TargetType::collection("Shop.Model.Product"))]
#[case("Products/Shop.Model.MostExpensive()/Name", TargetType::primitive(PrimitiveKind::String))]
#[case("Orders(1)/Shop.Model.Reorder(count=2)", TargetType::single("Shop.Model.Order"))]
#[case("ProductsByPrice(min=9.99)", TargetType::collection("Shop.Model.Product"))]
#[case("ProductsByPrice(min=1)(3)/Price", TargetType::primitive(PrimitiveKind::Decimal))]
fn test_resolved_targets(#[case] path: &str, #[case] expected: TargetType) {
    let resolved = parse_path(path).unwrap();
    assert_eq!(resolved.target, Some(expected), "{path}");
}

#[test]
fn test_single_key_round_trip() {
    let path = parse_path("Products(42)").unwrap();
    assert_eq!(path.entity_set().map(|n| n.as_str()), Some("Products"));
    assert_eq!(
        path.last_key(),
        Some(&KeyPredicate::Single(Literal::Number(Decimal::from(42))))
    );
    assert_eq!(path.to_string(), "Products(42)");
}

#[test]
fn test_composite_key_round_trip() {
    let path = parse_path("OrderLines(k1=1,k2='a')").unwrap();
    let key = path.last_key().unwrap();
    assert_eq!(key.get("k1"), Some(&Literal::Number(Decimal::from(1))));
    assert_eq!(key.get("k2"), Some(&Literal::String("a".into())));
    assert_eq!(path.to_string(), "OrderLines(k1=1,k2='a')");
}

#[test]
fn test_composite_key_missing_part() {
    let err = resolve_error("OrderLines(k1=1)");
    assert_eq!(
        err,
        ResolveError::IncompleteKey {
            type_name: "Shop.Model.OrderLine".into(),
            missing: vec!["k2".into()],
        }
    );
}

#[test]
fn test_composite_key_extra_part() {
    let err = resolve_error("OrderLines(k1=1,k2='a',k3=2)");
    assert!(matches!(err, ResolveError::UnexpectedKeyProperty { name, .. } if name == "k3"));
}

#[test]
fn test_composite_key_needs_names() {
    let err = resolve_error("OrderLines(1)");
    assert!(matches!(err, ResolveError::IncompleteKey { .. }));
}

#[test]
fn test_key_literal_must_fit_key_type() {
    let err = resolve_error("Products('one')");
    assert!(matches!(err, ResolveError::TypeMismatch { .. }), "{err:?}");
}

#[test]
fn test_segments_are_classified() {
    let path = parse_path("Orders(1)/Customer/Shop.Model.VipCustomer/Orders/$count").unwrap();
    let kinds: Vec<_> = path
        .segments
        .iter()
        .map(|s| match s {
            Segment::EntitySet { .. } => "set",
            Segment::Key(_) => "key",
            Segment::Navigation { .. } => "nav",
            Segment::TypeCast { .. } => "cast",
            Segment::Count => "count",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["set", "key", "nav", "cast", "nav", "count"]);
}

#[test]
fn test_entity_type_missing_from_model() {
    let schema = Schema::new("Shop").structured_type(
        StructuredType::entity("Customer")
            .key(["Id"])
            .property("Id", "Edm.Int32"),
    );
    let container = EntityContainer::new("Svc")
        .entity_set("Customers", "Shop.Customer")
        .entity_set("Orders", "Shop.Order");
    let model = Edm::builder().schema(schema).container(container).build();

    assert!(parse_resource_path("Customers(1)", &model).is_ok());
    let err = parse_resource_path("Orders(1)", &model).unwrap_err();
    assert_eq!(
        err,
        Error::Resolve(ResolveError::UnknownType {
            name: "Shop.Order".into()
        })
    );
}

#[rstest]
#[case("Nowhere", "UnknownResource")]
#[case("Products(1)/Colour", "UnknownProperty")]
#[case("Products/Name", "KeyRequired")]
#[case("Cheapest(1)", "KeyNotAllowed")]
#[case("Products/Shop.Model.Order", "InvalidTypeCast")]
#[case("Products/Other.Thing()", "UnknownSchema")]
#[case("Orders(1)/Shop.Model.Cancel", "UnknownOperation")]
#[case("Orders/Shop.Model.Ship", "BindingMismatch")]
#[case("Orders(1)/Shop.Model.Reorder()", "MissingParameter")]
#[case("Orders(1)/Shop.Model.Reorder", "MissingParameter")]
#[case("Products/Shop.Model.MostExpensive", "MissingParameter")]
#[case("ProductsByPrice", "MissingParameter")]
#[case("Orders(1)/Shop.Model.Reorder(count='x')", "TypeMismatch")]
#[case("Orders(1)/Shop.Model.Ship(now=true)", "ActionArguments")]
#[case("Orders(1)/Shop.Model.Reorder(count=1)/Id", "SegmentAfterTerminal")]
#[case("Products(1)/$count", "NotACollection")]
#[case("Products(1)/$value", "SegmentNotAllowed")]
fn test_rejected_paths(#[case] path: &str, #[case] variant: &str) {
    let err = resolve_error(path);
    assert!(format!("{err:?}").starts_with(variant), "{path}: {err:?}");
}

#[test]
fn test_syntax_errors_are_not_resolution_errors() {
    let err = parse_path("Products(1").unwrap_err();
    assert!(err.is_syntax());
}
