//! Whole request URIs: service root, `$metadata`, formats and decoding.

use odata::parser::ErrorCode;
use odata::syntax::QueryOption;
use odata::{Error, FormatAlias, ParserConfig, RelativeUri, ResolveError, TargetType, UriParser};
use rstest::rstest;

use crate::helpers::{MODEL, parse};

#[test]
fn test_service_root_is_inferred() {
    let uri = parse("http://localhost:8080/shop/Products(1)/Name").unwrap();
    assert_eq!(uri.service_root, "http://localhost:8080/shop");
    assert_eq!(uri.resource_path().unwrap().to_string(), "Products(1)/Name");
}

#[rstest]
#[case("http://host/shop/Widgets(1)")]
#[case("http://host/shop/Widgets")]
#[case("http://host/shop/Widgets?$top=1")]
fn test_unknown_resource_under_inferred_root(#[case] uri: &str) {
    let err = parse(uri).unwrap_err();
    assert!(matches!(err, Error::Resolve(ResolveError::UnknownResource { .. })), "{uri}: {err:?}");
}

#[test]
fn test_misspelled_metadata_is_rejected() {
    let err = parse("http://host/shop/$metdata").unwrap_err();
    assert!(matches!(err, Error::Syntax(ref e) if e.code == ErrorCode::E0301), "{err:?}");
}

#[test]
fn test_inferred_root_without_resource_path() {
    let uri = parse("http://host/shop").unwrap();
    assert_eq!(uri.service_root, "http://host/shop");
    assert_eq!(uri.relative_uri, RelativeUri::ServiceRoot);
    let uri = parse("http://host/shop/").unwrap();
    assert_eq!(uri.relative_uri, RelativeUri::ServiceRoot);
}

#[test]
fn test_relative_uri() {
    let uri = parse("Products(1)").unwrap();
    assert_eq!(uri.service_root, "");
    assert_eq!(uri.target(), Some(&TargetType::single("Shop.Model.Product")));
}

#[test]
fn test_service_document() {
    let parser = UriParser::with_config(
        &*MODEL,
        ParserConfig::default().with_service_root("http://host/shop"),
    );
    let uri = parser.parse_uri("http://host/shop/").unwrap();
    assert_eq!(uri.relative_uri, RelativeUri::ServiceRoot);

    let uri = parser.parse_uri("http://host/shop?$format=json").unwrap();
    assert_eq!(uri.format().map(|f| f.media_type.as_str()), Some("application/json"));
}

#[test]
fn test_configured_root_must_match() {
    let parser = UriParser::with_config(
        &*MODEL,
        ParserConfig::default().with_service_root("http://host/shop"),
    );
    let err = parser.parse_uri("http://elsewhere/shop/Products").unwrap_err();
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(err.code, ErrorCode::E0304);
}

#[rstest]
#[case("json", "application/json")]
#[case("xml", "application/xml")]
#[case("application/json", "application/json")]
fn test_metadata_formats(#[case] format: &str, #[case] media_type: &str) {
    let uri = parse(&format!("http://host/shop/$metadata?$format={format}")).unwrap();
    assert!(uri.is_metadata());
    assert_eq!(uri.format().map(|f| f.media_type.as_str()), Some(media_type));
}

#[test]
fn test_metadata_without_format() {
    let uri = parse("http://host/shop/$metadata#Products").unwrap();
    assert_eq!(
        uri.relative_uri,
        RelativeUri::Metadata {
            format: None,
            fragment: Some("Products".into()),
        }
    );
}

#[test]
fn test_metadata_unsupported_format() {
    let err = parse("http://host/shop/$metadata?$format=superman").unwrap_err();
    assert!(err.is_unsupported_format(), "{err:?}");
    assert!(err.to_string().contains("superman"));
}

#[test]
fn test_custom_format_alias() {
    let config = ParserConfig::default().with_supported_formats(vec![FormatAlias::new("csv", "text/csv")]);
    let parser = UriParser::with_config(&*MODEL, config);
    let uri = parser.parse_uri("Products?$format=csv").unwrap();
    assert_eq!(uri.format().map(|f| f.media_type.as_str()), Some("text/csv"));
    assert!(parser.parse_uri("Products?$format=json").unwrap_err().is_unsupported_format());
}

#[test]
fn test_metadata_rejects_other_options() {
    let err = parse("$metadata?$top=1").unwrap_err();
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(err.code, ErrorCode::E0504);
}

#[test]
fn test_percent_encoded_path_and_query() {
    let uri = parse("Customers('Caf%C3%A9')/Orders?$filter=Status%20eq%20Shop.Model.Status'Open'").unwrap();
    assert_eq!(uri.resource_path().unwrap().to_string(), "Customers('Café')/Orders");
    assert!(matches!(uri.options(), [QueryOption::Filter(_)]));
}

#[test]
fn test_bad_percent_encoding() {
    let err = parse("Products?$filter=Name%2").unwrap_err();
    let Error::Syntax(err) = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert_eq!(err.code, ErrorCode::E0103);
}

#[test]
fn test_custom_options_pass_through() {
    let uri = parse("Products?debug=true&$top=2").unwrap();
    assert_eq!(
        uri.options()[0],
        QueryOption::Custom {
            name: "debug".into(),
            value: "true".into()
        }
    );
}

#[test]
fn test_error_kinds() {
    assert!(parse("Products(").unwrap_err().is_syntax());
    assert!(parse("Widgets").unwrap_err().is_resolution());
}
