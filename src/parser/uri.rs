//! Splitting a request URI into service root, path, query and fragment.

use percent_encoding::percent_decode_str;

use super::errors::{ErrorCode, SyntaxError};

/// The raw parts of a request URI, still percent-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UriParts<'a> {
    /// Everything before `?` and `#`.
    pub location: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

pub fn split_uri(uri: &str) -> UriParts<'_> {
    let (rest, fragment) = match uri.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (uri, None),
    };
    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    UriParts {
        location,
        query,
        fragment,
    }
}

/// Split an absolute URI into `scheme://authority` and the path after it.
///
/// Relative input has an empty origin.
pub fn split_origin(location: &str) -> (&str, &str) {
    let Some(scheme_end) = location.find("://") else {
        return ("", location);
    };
    let authority_start = scheme_end + 3;
    match location[authority_start..].find('/') {
        Some(slash) => location.split_at(authority_start + slash),
        None => (location, ""),
    }
}

/// Percent-decode one URI component.
///
/// Malformed escapes (`%4`, `%zz`) and escapes that do not decode to UTF-8
/// are errors rather than being passed through.
pub fn decode_component(text: &str, plus_as_space: bool) -> Result<String, SyntaxError> {
    let bytes = text.as_bytes();
    for (idx, _) in text.match_indices('%') {
        let valid = bytes
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(SyntaxError::for_input(
                ErrorCode::E0103,
                format!("invalid percent-encoding at byte {idx}"),
                &text[idx..],
            ));
        }
    }

    let replaced;
    let text = if plus_as_space && text.contains('+') {
        replaced = text.replace('+', " ");
        replaced.as_str()
    } else {
        text
    };
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| SyntaxError::for_input(ErrorCode::E0103, "percent-encoding is not valid UTF-8", text))
}

/// Split a query string into decoded `(name, value)` pairs, in order.
///
/// A pair without `=` has an empty value.
pub fn split_query(query: &str, plus_as_space: bool) -> Result<Vec<(String, String)>, SyntaxError> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((
                decode_component(name, plus_as_space)?,
                decode_component(value, plus_as_space)?,
            ))
        })
        .collect()
}
