//! Identifier rules for OData simple and qualified names.

/// Check if `text` is a valid OData simple identifier.
///
/// Follows Unicode Standard Annex #31 with `_` allowed as a start character,
/// which is what CSDL's `SimpleIdentifier` boils down to.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Check if `text` is a dotted name whose every part is an identifier.
///
/// A single identifier also counts as a (namespace-less) qualified name.
pub fn is_qualified_name(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

/// Split `Namespace.Name` at the last dot.
///
/// Returns `None` for names without a namespace.
///
/// # Example
/// ```
/// use odata::base::split_qualified_name;
///
/// assert_eq!(split_qualified_name("My.Ns.Person"), Some(("My.Ns", "Person")));
/// assert_eq!(split_qualified_name("Person"), None);
/// ```
pub fn split_qualified_name(text: &str) -> Option<(&str, &str)> {
    text.rsplit_once('.')
}
