//! Parser configuration.
//!
//! A [`ParserConfig`] is immutable once handed to a [`UriParser`](crate::UriParser)
//! and shared by every parse it performs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::base::constants::{MEDIA_TYPE_ATOM, MEDIA_TYPE_JSON, MEDIA_TYPE_XML};

/// A `$format` value the service accepts, and the media type it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FormatAlias {
    pub alias: String,
    pub media_type: String,
}

impl FormatAlias {
    pub fn new(alias: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            media_type: media_type.into(),
        }
    }

    /// Whether `value` (without media type parameters) names this format.
    pub fn matches(&self, value: &str) -> bool {
        self.alias.eq_ignore_ascii_case(value) || self.media_type.eq_ignore_ascii_case(value)
    }
}

/// Runtime parser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct ParserConfig {
    /// Absolute URIs must start with this; when unset the root is inferred.
    pub service_root: Option<String>,
    pub supported_formats: Vec<FormatAlias>,
    /// Match `$Filter` as `$filter`.
    pub case_insensitive_options: bool,
    /// Accept `filter=` for `$filter=` (OData 4.01).
    pub optional_dollar_prefix: bool,
    /// Deepest nesting of parentheses, lambdas and nested `$expand`.
    pub max_expression_depth: usize,
    /// Decode `+` in query strings as a space.
    pub plus_as_space: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            service_root: None,
            supported_formats: vec![
                FormatAlias::new("json", MEDIA_TYPE_JSON),
                FormatAlias::new("xml", MEDIA_TYPE_XML),
                FormatAlias::new("atom", MEDIA_TYPE_ATOM),
            ],
            case_insensitive_options: true,
            optional_dollar_prefix: false,
            max_expression_depth: 100,
            plus_as_space: false,
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn with_service_root(mut self, root: impl Into<String>) -> Self {
        let root = root.into();
        self.service_root = Some(root.trim_end_matches('/').to_string());
        self
    }

    #[must_use]
    pub fn with_supported_formats(mut self, formats: Vec<FormatAlias>) -> Self {
        self.supported_formats = formats;
        self
    }

    #[must_use]
    pub fn with_case_insensitive_options(mut self, enabled: bool) -> Self {
        self.case_insensitive_options = enabled;
        self
    }

    #[must_use]
    pub fn with_optional_dollar_prefix(mut self, enabled: bool) -> Self {
        self.optional_dollar_prefix = enabled;
        self
    }

    #[must_use]
    pub fn with_max_expression_depth(mut self, depth: usize) -> Self {
        self.max_expression_depth = depth;
        self
    }

    #[must_use]
    pub fn with_plus_as_space(mut self, enabled: bool) -> Self {
        self.plus_as_space = enabled;
        self
    }

    /// Find the supported format a `$format` value names.
    pub fn find_format(&self, value: &str) -> Option<&FormatAlias> {
        self.supported_formats.iter().find(|f| f.matches(value))
    }

    /// Aliases of all supported formats, for error reporting.
    pub fn format_aliases(&self) -> Vec<String> {
        self.supported_formats.iter().map(|f| f.alias.clone()).collect()
    }

    /// Compare two option names under the configured case rule.
    pub(crate) fn option_name_eq(&self, a: &str, b: &str) -> bool {
        if self.case_insensitive_options {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert!(config.service_root.is_none());
        assert!(config.case_insensitive_options);
        assert!(!config.optional_dollar_prefix);
        assert_eq!(config.max_expression_depth, 100);
        assert_eq!(config.format_aliases(), vec!["json", "xml", "atom"]);
    }

    #[test]
    fn test_find_format_by_alias_or_media_type() {
        let config = ParserConfig::default();
        assert_eq!(config.find_format("JSON").map(|f| f.media_type.as_str()), Some(MEDIA_TYPE_JSON));
        assert_eq!(config.find_format("application/xml").map(|f| f.alias.as_str()), Some("xml"));
        assert!(config.find_format("superman").is_none());
    }

    #[test]
    fn test_service_root_trailing_slash_trimmed() {
        let config = ParserConfig::default().with_service_root("http://host/svc/");
        assert_eq!(config.service_root.as_deref(), Some("http://host/svc"));
    }

    #[test]
    fn test_option_name_case_rule() {
        let config = ParserConfig::default();
        assert!(config.option_name_eq("$Filter", "$filter"));
        let strict = config.with_case_insensitive_options(false);
        assert!(!strict.option_name_eq("$Filter", "$filter"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_config_from_json() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"service_root":"http://host/svc","plus_as_space":true}"#).unwrap();
        assert_eq!(config.service_root.as_deref(), Some("http://host/svc"));
        assert!(config.plus_as_space);
        assert_eq!(config.max_expression_depth, 100);
        assert_eq!(config.format_aliases(), vec!["json", "xml", "atom"]);
    }
}
