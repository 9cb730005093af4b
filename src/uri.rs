//! URI Model: the validated result handed to callers.
//!
//! ```text
//! ODataUri
//! ├── service_root: "http://host/svc"
//! └── relative_uri
//!     ├── ServiceRoot
//!     ├── Metadata { format, fragment }
//!     └── ResourcePath { path: ResourcePath { segments, target }, options }
//! ```

use std::fmt;

use crate::base::Name;
use crate::edm::{OperationKind, PrimitiveKind, TypeRef};
use crate::syntax::{Format, KeyPredicate, Literal, QueryOption};

/// The resolved OData type of a path or expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    /// Qualified type name, e.g. `Demo.Product` or `Edm.String`.
    pub type_name: Name,
    pub is_collection: bool,
}

impl TargetType {
    pub fn single(type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            is_collection: false,
        }
    }

    pub fn collection(type_name: impl Into<Name>) -> Self {
        Self {
            type_name: type_name.into(),
            is_collection: true,
        }
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::single(kind.qualified_name())
    }

    /// The element type of a collection, or the type itself.
    pub fn element(&self) -> Self {
        Self::single(self.type_name.clone())
    }
}

impl From<&TypeRef> for TargetType {
    fn from(ty: &TypeRef) -> Self {
        Self {
            type_name: ty.name.clone(),
            is_collection: ty.collection,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_collection {
            write!(f, "Collection({})", self.type_name)
        } else {
            f.write_str(&self.type_name)
        }
    }
}

/// One resolved resource path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    EntitySet {
        name: Name,
        entity_type: Name,
    },
    Singleton {
        name: Name,
        entity_type: Name,
    },
    Key(KeyPredicate),
    Navigation {
        name: Name,
        target: TargetType,
    },
    /// A structural property, or a dynamic property of an open type.
    Property {
        name: Name,
        target: TargetType,
    },
    TypeCast {
        type_name: Name,
    },
    /// `Namespace.Operation(...)` applied to the preceding segment.
    BoundOperation {
        operation: Name,
        kind: OperationKind,
        parameters: Vec<(Name, Literal)>,
        target: Option<TargetType>,
    },
    /// A function or action import at the service root.
    OperationImport {
        name: Name,
        operation: Name,
        kind: OperationKind,
        parameters: Vec<(Name, Literal)>,
        target: Option<TargetType>,
    },
    Ref,
    Value,
    Count,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntitySet { name, .. }
            | Self::Singleton { name, .. }
            | Self::Navigation { name, .. }
            | Self::Property { name, .. } => f.write_str(name),
            Self::Key(key) => write!(f, "{key}"),
            Self::TypeCast { type_name } => f.write_str(type_name),
            Self::BoundOperation {
                operation,
                kind,
                parameters,
                ..
            } => {
                f.write_str(operation)?;
                match kind {
                    OperationKind::Function => write_params(f, parameters),
                    OperationKind::Action => Ok(()),
                }
            }
            Self::OperationImport {
                name,
                kind,
                parameters,
                ..
            } => {
                f.write_str(name)?;
                match kind {
                    OperationKind::Function => write_params(f, parameters),
                    OperationKind::Action => Ok(()),
                }
            }
            Self::Ref => f.write_str("$ref"),
            Self::Value => f.write_str("$value"),
            Self::Count => f.write_str("$count"),
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[(Name, Literal)]) -> fmt::Result {
    f.write_str("(")?;
    for (idx, (name, value)) in params.iter().enumerate() {
        if idx > 0 {
            f.write_str(",")?;
        }
        write!(f, "{name}={value}")?;
    }
    f.write_str(")")
}

/// A resolved resource path, root first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    pub segments: Vec<Segment>,
    /// What the path addresses; `None` after an action without a return type.
    pub target: Option<TargetType>,
}

impl ResourcePath {
    /// The entity set the path starts from, if any.
    pub fn entity_set(&self) -> Option<&Name> {
        match self.segments.first()? {
            Segment::EntitySet { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The last key predicate in the path.
    pub fn last_key(&self) -> Option<&KeyPredicate> {
        self.segments.iter().rev().find_map(|s| match s {
            Segment::Key(key) => Some(key),
            _ => None,
        })
    }

    pub fn is_collection(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.is_collection)
    }

    /// The type query options apply to.
    ///
    /// Same as [`target`](Self::target), except that for a trailing `$count`
    /// it is the collection being counted.
    pub fn query_target(&self) -> Option<TargetType> {
        let counted = match self.segments.split_last() {
            Some((Segment::Count, rest)) => rest,
            _ => return self.target.clone(),
        };
        let mut current: Option<TargetType> = None;
        for segment in counted {
            current = match segment {
                Segment::EntitySet { entity_type, .. } => Some(TargetType::collection(entity_type.clone())),
                Segment::Singleton { entity_type, .. } => Some(TargetType::single(entity_type.clone())),
                Segment::Key(_) => current.map(|t| t.element()),
                Segment::Navigation { target, .. } | Segment::Property { target, .. } => Some(target.clone()),
                Segment::TypeCast { type_name } => current.map(|t| TargetType {
                    type_name: type_name.clone(),
                    is_collection: t.is_collection,
                }),
                Segment::BoundOperation { target, .. } | Segment::OperationImport { target, .. } => {
                    target.clone()
                }
                Segment::Ref | Segment::Value | Segment::Count => current,
            };
        }
        current
    }

    pub fn is_ref(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Ref))
    }
}

/// Segments joined without the key separator: `Products(1)/Name`.
impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 && !matches!(segment, Segment::Key(_)) {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelativeUri {
    /// The service document.
    ServiceRoot,
    /// `$metadata`, with an optional `$format` and `#fragment`.
    Metadata {
        format: Option<Format>,
        fragment: Option<String>,
    },
    ResourcePath {
        path: ResourcePath,
        options: Vec<QueryOption>,
    },
}

/// A parsed and validated request URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ODataUri {
    /// The service root, without a trailing `/`.
    pub service_root: String,
    pub relative_uri: RelativeUri,
}

impl ODataUri {
    pub fn resource_path(&self) -> Option<&ResourcePath> {
        match &self.relative_uri {
            RelativeUri::ResourcePath { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn options(&self) -> &[QueryOption] {
        match &self.relative_uri {
            RelativeUri::ResourcePath { options, .. } => options,
            _ => &[],
        }
    }

    /// The requested `$format`, wherever it was given.
    pub fn format(&self) -> Option<&Format> {
        match &self.relative_uri {
            RelativeUri::Metadata { format, .. } => format.as_ref(),
            RelativeUri::ResourcePath { options, .. } => options.iter().find_map(|o| match o {
                QueryOption::Format(format) => Some(format),
                _ => None,
            }),
            RelativeUri::ServiceRoot => None,
        }
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self.relative_uri, RelativeUri::Metadata { .. })
    }

    /// The resolved target of a resource path request.
    pub fn target(&self) -> Option<&TargetType> {
        self.resource_path()?.target.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_type_display() {
        assert_eq!(TargetType::collection("Demo.Product").to_string(), "Collection(Demo.Product)");
        assert_eq!(TargetType::primitive(PrimitiveKind::Int32).to_string(), "Edm.Int32");
        assert_eq!(TargetType::collection("Demo.Product").element(), TargetType::single("Demo.Product"));
    }

    #[test]
    fn test_resource_path_display() {
        let path = ResourcePath {
            segments: vec![
                Segment::EntitySet {
                    name: Name::new("Products"),
                    entity_type: Name::new("Demo.Product"),
                },
                Segment::Key(KeyPredicate::Single(Literal::Number(1.into()))),
                Segment::Property {
                    name: Name::new("Name"),
                    target: TargetType::primitive(PrimitiveKind::String),
                },
                Segment::Value,
            ],
            target: Some(TargetType::primitive(PrimitiveKind::String)),
        };
        assert_eq!(path.to_string(), "Products(1)/Name/$value");
        assert_eq!(path.entity_set().map(Name::as_str), Some("Products"));
        assert!(path.last_key().is_some());
        assert!(!path.is_collection());
    }
}
