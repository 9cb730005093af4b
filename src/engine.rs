//! Request URI parsing: splitting, syntax, resolution and option checks in one call.
//!
//! ```text
//! "http://host/svc/People(1)/Orders?$top=2"
//!   │ split_uri / service root
//!   ├── service_root  "http://host/svc"
//!   ├── path          "People(1)/Orders" ──► grammar ──► resolve_path ──► ResourcePath
//!   └── query         "$top=2"           ──► options ──► validate_options
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::base::constants::METADATA;
use crate::config::ParserConfig;
use crate::edm::EntityDataModel;
use crate::error::Error;
use crate::parser::errors::{ErrorCode, SyntaxError};
use crate::parser::uri::{decode_component, split_origin, split_query, split_uri};
use crate::parser::{grammar, parse_query_options, run};
use crate::semantic::{ResolveError, Resolver};
use crate::syntax::QueryOption;
use crate::uri::{ODataUri, RelativeUri, ResourcePath};

/// Parses request URIs against one model.
///
/// Holds no per-request state; one parser can serve any number of threads.
#[derive(Debug, Clone)]
pub struct UriParser<'m> {
    model: &'m dyn EntityDataModel,
    config: ParserConfig,
}

impl<'m> UriParser<'m> {
    pub fn new(model: &'m dyn EntityDataModel) -> Self {
        Self::with_config(model, ParserConfig::default())
    }

    pub fn with_config(model: &'m dyn EntityDataModel, config: ParserConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn model(&self) -> &'m dyn EntityDataModel {
        self.model
    }

    /// Parse an absolute or relative request URI, including its query string.
    pub fn parse_uri(&self, uri: &str) -> Result<ODataUri, Error> {
        debug!(uri, "parsing request uri");
        let parts = split_uri(uri.trim());
        let (service_root, path) = self.split_service_root(parts.location)?;
        let path = decode_component(path, false)?;
        let path = path.trim_matches('/');
        let pairs = match parts.query {
            Some(query) => split_query(query, self.config.plus_as_space)?,
            None => Vec::new(),
        };
        let options = parse_query_options(&pairs, &self.config)?;

        let relative_uri = if path.is_empty() {
            only_format(&options, "the service document")?;
            RelativeUri::ServiceRoot
        } else if path == METADATA {
            only_format(&options, METADATA)?;
            let format = options.into_iter().find_map(|option| match option {
                QueryOption::Format(format) => Some(format),
                _ => None,
            });
            RelativeUri::Metadata {
                format,
                fragment: parts.fragment.map(str::to_string),
            }
        } else {
            let resource = self.resolve(path)?;
            Resolver::new(self.model).validate_options(&resource, &options)?;
            RelativeUri::ResourcePath {
                path: resource,
                options,
            }
        };

        let uri = ODataUri {
            service_root,
            relative_uri,
        };
        debug!(resolved = ?uri.target(), "parsed request uri");
        Ok(uri)
    }

    /// Parse a resource path on its own, e.g. an entity reference from a request body.
    pub fn parse_resource_path(&self, path: &str) -> Result<ResourcePath, Error> {
        let decoded = decode_component(path.trim(), false)?;
        self.resolve(&decoded)
    }

    /// Parse many URIs in parallel; each result is independent of the others.
    pub fn parse_many(&self, uris: &[&str]) -> Vec<Result<ODataUri, Error>> {
        uris.par_iter().map(|uri| self.parse_uri(uri)).collect()
    }

    fn resolve(&self, path: &str) -> Result<ResourcePath, Error> {
        let raw = run(path, &self.config, grammar::parse_resource_path)?;
        if raw.is_empty() {
            return Err(ResolveError::EmptyPath.into());
        }
        Ok(Resolver::new(self.model).resolve_path(&raw)?)
    }

    /// Split the location into service root and resource path.
    ///
    /// Without a configured root, the root ends before the first segment that
    /// is `$metadata` or names a member of the entity container.
    fn split_service_root<'u>(&self, location: &'u str) -> Result<(String, &'u str), Error> {
        let (origin, path) = split_origin(location);

        if let Some(root) = &self.config.service_root {
            if let Some(rest) = location.strip_prefix(root.as_str()) {
                if rest.is_empty() || rest.starts_with('/') {
                    return Ok((root.clone(), rest));
                }
            }
            if !origin.is_empty() {
                return Err(SyntaxError::for_input(
                    ErrorCode::E0304,
                    format!("'{location}' is not under the service root '{root}'"),
                    location,
                )
                .into());
            }
            return Ok((root.clone(), location));
        }

        let mut offset = 0;
        for segment in path.split('/') {
            let name = segment.split_once('(').map_or(segment, |(name, _)| name);
            if name == METADATA || self.model.container().member(name).is_some() {
                let root = format!("{origin}{}", path[..offset].trim_end_matches('/'));
                return Ok((root, &path[offset..]));
            }
            offset += segment.len() + 1;
        }

        if origin.is_empty() {
            return Ok((String::new(), location));
        }
        Ok(split_unknown_tail(origin, path))
    }
}

/// No segment named a container member. A trailing `/` or a lone plain
/// segment marks a service root; otherwise the last segment is taken as the
/// resource path so that it fails resolution instead of vanishing into the root.
fn split_unknown_tail<'u>(origin: &str, path: &'u str) -> (String, &'u str) {
    let trimmed = path.trim_start_matches('/');
    let last_start = path.rfind('/').map_or(0, |idx| idx + 1);
    let last = &path[last_start..];
    let looks_like_resource = last.contains('(') || last.starts_with('$') || trimmed.contains('/');
    if last.is_empty() || !looks_like_resource {
        return (format!("{origin}{}", path.trim_end_matches('/')), "");
    }
    (format!("{origin}{}", path[..last_start].trim_end_matches('/')), last)
}

/// Reject every system option except `$format`.
fn only_format(options: &[QueryOption], target: &str) -> Result<(), Error> {
    let misplaced = options
        .iter()
        .find(|option| !matches!(option, QueryOption::Format(_) | QueryOption::Custom { .. }));
    match misplaced {
        Some(option) => Err(SyntaxError::for_input(
            ErrorCode::E0504,
            format!("{} is not allowed on {target}", option.name()),
            option.name(),
        )
        .into()),
        None => Ok(()),
    }
}

/// Parse a request URI against `model` with the default configuration.
///
/// ```
/// use odata::edm::{Edm, EntityContainer, Schema, StructuredType};
///
/// let model = Edm::builder()
///     .schema(
///         Schema::new("Demo").structured_type(
///             StructuredType::entity("Person").key(["Id"]).property("Id", "Edm.Int32"),
///         ),
///     )
///     .container(EntityContainer::new("Service").entity_set("People", "Demo.Person"))
///     .build();
///
/// let uri = odata::parse_uri("http://host/svc/People(1)?$select=Id", &model).unwrap();
/// assert_eq!(uri.service_root, "http://host/svc");
/// assert_eq!(uri.target().map(|t| t.to_string()), Some("Demo.Person".to_string()));
/// ```
pub fn parse_uri(uri: &str, model: &dyn EntityDataModel) -> Result<ODataUri, Error> {
    UriParser::new(model).parse_uri(uri)
}

/// Parse a resource path against `model` with the default configuration.
pub fn parse_resource_path(path: &str, model: &dyn EntityDataModel) -> Result<ResourcePath, Error> {
    UriParser::new(model).parse_resource_path(path)
}
