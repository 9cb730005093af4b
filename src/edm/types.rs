//! Descriptor records for types and properties.

use std::fmt;

use indexmap::IndexMap;

use crate::base::Name;
use crate::base::constants::EDM_NAMESPACE_PREFIX;

/// Built-in primitive types of the `Edm` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
}

impl PrimitiveKind {
    const ALL: [PrimitiveKind; 23] = [
        Self::Binary,
        Self::Boolean,
        Self::Byte,
        Self::Date,
        Self::DateTimeOffset,
        Self::Decimal,
        Self::Double,
        Self::Duration,
        Self::Guid,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::SByte,
        Self::Single,
        Self::Stream,
        Self::String,
        Self::TimeOfDay,
        Self::GeographyPoint,
        Self::GeographyLineString,
        Self::GeographyPolygon,
        Self::GeometryPoint,
        Self::GeometryLineString,
        Self::GeometryPolygon,
    ];

    /// Simple name inside the `Edm` namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Duration => "Duration",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::Stream => "Stream",
            Self::String => "String",
            Self::TimeOfDay => "TimeOfDay",
            Self::GeographyPoint => "GeographyPoint",
            Self::GeographyLineString => "GeographyLineString",
            Self::GeographyPolygon => "GeographyPolygon",
            Self::GeometryPoint => "GeometryPoint",
            Self::GeometryLineString => "GeometryLineString",
            Self::GeometryPolygon => "GeometryPolygon",
        }
    }

    /// Fully qualified name, e.g. `Edm.Int32`.
    pub fn qualified_name(&self) -> Name {
        smol_str::format_smolstr!("{EDM_NAMESPACE_PREFIX}{}", self.as_str())
    }

    /// Look up a primitive kind by its qualified name (`Edm.String`).
    pub fn from_qualified_name(name: &str) -> Option<Self> {
        let simple = name.strip_prefix(EDM_NAMESPACE_PREFIX)?;
        Self::ALL.into_iter().find(|kind| kind.as_str() == simple)
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::SByte | Self::Int16 | Self::Int32 | Self::Int64
        )
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Self::Decimal | Self::Double | Self::Single)
    }

    pub fn is_geographic(&self) -> bool {
        matches!(
            self,
            Self::GeographyPoint | Self::GeographyLineString | Self::GeographyPolygon
        )
    }

    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            Self::GeometryPoint | Self::GeometryLineString | Self::GeometryPolygon
        )
    }

    pub fn is_spatial(&self) -> bool {
        self.is_geographic() || self.is_geometric()
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{EDM_NAMESPACE_PREFIX}{}", self.as_str())
    }
}

/// A reference to a type by qualified name, optionally wrapped in `Collection(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: Name,
    pub collection: bool,
}

impl TypeRef {
    pub fn single(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            collection: false,
        }
    }

    pub fn collection(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            collection: true,
        }
    }

    /// Parse the CSDL spelling: `NS.Type` or `Collection(NS.Type)`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Some(inner) => Self::collection(inner.trim()),
            None => Self::single(text),
        }
    }

    /// The primitive kind this reference names, if any.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        PrimitiveKind::from_qualified_name(&self.name)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        Self::single(kind.qualified_name())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.collection {
            write!(f, "Collection({})", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A structural (non-navigation) property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: Name,
    pub ty: TypeRef,
    pub nullable: bool,
}

/// A property whose value references one or more related entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationProperty {
    pub name: Name,
    pub target: TypeRef,
    pub nullable: bool,
    pub partner: Option<Name>,
    pub contains_target: bool,
}

/// Either kind of property, as returned by member lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRef<'a> {
    Structural(&'a Property),
    Navigation(&'a NavigationProperty),
}

impl<'a> PropertyRef<'a> {
    pub fn name(&self) -> &'a Name {
        match self {
            Self::Structural(p) => &p.name,
            Self::Navigation(n) => &n.name,
        }
    }

    pub fn ty(&self) -> &'a TypeRef {
        match self {
            Self::Structural(p) => &p.ty,
            Self::Navigation(n) => &n.target,
        }
    }

    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::Navigation(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuredKind {
    Entity,
    Complex,
}

/// An entity type or complex type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredType {
    pub kind: StructuredKind,
    pub namespace: Name,
    pub name: Name,
    /// Qualified name of the base type.
    pub base_type: Option<Name>,
    /// Declared key property names, in declaration order. Empty when inherited.
    pub key: Vec<Name>,
    pub properties: IndexMap<Name, Property>,
    pub navigation_properties: IndexMap<Name, NavigationProperty>,
    pub is_abstract: bool,
    pub is_open: bool,
    pub has_stream: bool,
}

impl StructuredType {
    fn new(kind: StructuredKind, name: impl Into<Name>) -> Self {
        Self {
            kind,
            namespace: Name::default(),
            name: name.into(),
            base_type: None,
            key: Vec::new(),
            properties: IndexMap::new(),
            navigation_properties: IndexMap::new(),
            is_abstract: false,
            is_open: false,
            has_stream: false,
        }
    }

    pub fn entity(name: impl Into<Name>) -> Self {
        Self::new(StructuredKind::Entity, name)
    }

    pub fn complex(name: impl Into<Name>) -> Self {
        Self::new(StructuredKind::Complex, name)
    }

    pub fn qualified_name(&self) -> Name {
        qualify(&self.namespace, &self.name)
    }

    pub fn is_entity(&self) -> bool {
        self.kind == StructuredKind::Entity
    }

    pub fn key<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.key = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn base(mut self, qualified_name: impl Into<Name>) -> Self {
        self.base_type = Some(qualified_name.into());
        self
    }

    /// Add a non-nullable structural property.
    pub fn property(self, name: impl Into<Name>, ty: impl Into<TypeRef>) -> Self {
        self.add_property(name, ty, false)
    }

    pub fn nullable_property(self, name: impl Into<Name>, ty: impl Into<TypeRef>) -> Self {
        self.add_property(name, ty, true)
    }

    fn add_property(mut self, name: impl Into<Name>, ty: impl Into<TypeRef>, nullable: bool) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            Property {
                name,
                ty: ty.into(),
                nullable,
            },
        );
        self
    }

    pub fn navigation(mut self, name: impl Into<Name>, target: impl Into<TypeRef>) -> Self {
        let name = name.into();
        let target = target.into();
        self.navigation_properties.insert(
            name.clone(),
            NavigationProperty {
                name,
                nullable: !target.collection,
                target,
                partner: None,
                contains_target: false,
            },
        );
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn open(mut self) -> Self {
        self.is_open = true;
        self
    }

    pub fn media(mut self) -> Self {
        self.has_stream = true;
        self
    }

    /// Look up a property declared directly on this type.
    pub fn own_property(&self, name: &str) -> Option<PropertyRef<'_>> {
        self.properties
            .get(name)
            .map(PropertyRef::Structural)
            .or_else(|| {
                self.navigation_properties
                    .get(name)
                    .map(PropertyRef::Navigation)
            })
    }
}

/// An enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub namespace: Name,
    pub name: Name,
    pub underlying: PrimitiveKind,
    pub is_flags: bool,
    pub members: IndexMap<Name, i64>,
}

impl EnumType {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            namespace: Name::default(),
            name: name.into(),
            underlying: PrimitiveKind::Int32,
            is_flags: false,
            members: IndexMap::new(),
        }
    }

    pub fn member(mut self, name: impl Into<Name>, value: i64) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    pub fn flags(mut self) -> Self {
        self.is_flags = true;
        self
    }

    pub fn qualified_name(&self) -> Name {
        qualify(&self.namespace, &self.name)
    }
}

/// A named type declared in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Structured(StructuredType),
    Enum(EnumType),
}

impl SchemaType {
    pub fn name(&self) -> &Name {
        match self {
            Self::Structured(t) => &t.name,
            Self::Enum(t) => &t.name,
        }
    }

    pub fn qualified_name(&self) -> Name {
        match self {
            Self::Structured(t) => t.qualified_name(),
            Self::Enum(t) => t.qualified_name(),
        }
    }

    pub fn as_structured(&self) -> Option<&StructuredType> {
        match self {
            Self::Structured(t) => Some(t),
            Self::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(t) => Some(t),
            Self::Structured(_) => None,
        }
    }
}

pub(crate) fn qualify(namespace: &str, name: &str) -> Name {
    if namespace.is_empty() {
        Name::new(name)
    } else {
        smol_str::format_smolstr!("{namespace}.{name}")
    }
}
