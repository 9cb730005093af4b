//! One parser shared across threads.

use std::thread;

use odata::UriParser;

use crate::helpers::MODEL;

const URIS: &[&str] = &[
    "Products?$filter=Price gt 5&$orderby=Name",
    "Customers('A')/Orders?$expand=Lines($select=Quantity)",
    "OrderLines(k1=1,k2='x')/Product/Category",
    "$metadata?$format=xml",
    "Products/$count",
    "Widgets",
];

#[test]
fn test_parse_many_matches_sequential() {
    let parser = UriParser::new(&*MODEL);
    let sequential: Vec<_> = URIS.iter().map(|uri| parser.parse_uri(uri)).collect();
    let parallel = parser.parse_many(URIS);
    assert_eq!(parallel, sequential);
    assert_eq!(parallel.iter().filter(|r| r.is_err()).count(), 1);
}

#[test]
fn test_shared_parser_across_threads() {
    let parser = UriParser::new(&*MODEL);
    let parser = &parser;
    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    (0..50)
                        .flat_map(|_| URIS.iter())
                        .map(|uri| parser.parse_uri(uri).is_ok())
                        .filter(|ok| *ok)
                        .count()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 50 * (URIS.len() - 1));
        }
    });
}
