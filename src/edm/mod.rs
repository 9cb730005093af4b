//! Entity Data Model: the schema the resolver validates against.
//!
//! The parser never builds or mutates a model; it only queries one through the
//! [`EntityDataModel`] trait. [`Edm`] is a plain in-memory implementation made of
//! immutable descriptor records, assembled with [`EdmBuilder`].
//!
//! ## Query Surface
//!
//! ```text
//! schema(namespace | alias)           → Schema
//! schema_type("NS.Type")              → entity / complex / enum type
//! resolve_type("Collection(NS.Type)") → TypeLookup + collection flag
//! property(type, name)                → own or inherited property
//! container member(name)              → entity set / singleton / operation import
//! operations(namespace, name)         → action/function overloads
//! ```

mod container;
mod model;
mod operations;
mod schema;
mod types;

pub use container::{ContainerMember, EntityContainer, EntitySet, OperationImport, Singleton};
pub use model::{Edm, EdmBuilder};
pub use operations::{Operation, OperationKind, Parameter};
pub use schema::Schema;
pub use types::{
    EnumType, NavigationProperty, PrimitiveKind, Property, PropertyRef, SchemaType,
    StructuredKind, StructuredType, TypeRef,
};

use std::fmt;

use crate::base::{Name, split_qualified_name};

/// Base-type chains longer than this are treated as cyclic.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// What a type name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLookup<'a> {
    Primitive(PrimitiveKind),
    Schema(&'a SchemaType),
}

/// Read-only view of an entity data model.
///
/// Implementations must be shareable across threads: a server parses many
/// requests against the same model concurrently.
pub trait EntityDataModel: Send + Sync + fmt::Debug {
    /// Look up a schema by namespace or alias.
    fn schema(&self, namespace_or_alias: &str) -> Option<&Schema>;

    fn container(&self) -> &EntityContainer;

    /// Look up a named type by qualified name (namespace or alias prefix).
    fn schema_type(&self, qualified_name: &str) -> Option<&SchemaType> {
        let (namespace, name) = split_qualified_name(qualified_name)?;
        self.schema(namespace)?.types.get(name)
    }

    fn structured_type(&self, qualified_name: &str) -> Option<&StructuredType> {
        self.schema_type(qualified_name)?.as_structured()
    }

    fn enum_type(&self, qualified_name: &str) -> Option<&EnumType> {
        self.schema_type(qualified_name)?.as_enum()
    }

    /// Resolve a type reference in CSDL spelling, including `Collection(...)`.
    fn resolve_type(&self, text: &str) -> Option<(TypeLookup<'_>, bool)> {
        let type_ref = TypeRef::parse(text);
        let lookup = match type_ref.primitive() {
            Some(kind) => TypeLookup::Primitive(kind),
            None => TypeLookup::Schema(self.schema_type(&type_ref.name)?),
        };
        Some((lookup, type_ref.collection))
    }

    fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.container().entity_sets.get(name)
    }

    fn singleton(&self, name: &str) -> Option<&Singleton> {
        self.container().singletons.get(name)
    }

    fn operation_import(&self, name: &str) -> Option<&OperationImport> {
        self.container().operation_imports.get(name)
    }

    /// All overloads of `namespace.name`; empty when none exist.
    fn operations(&self, namespace: &str, name: &str) -> &[Operation] {
        self.schema(namespace)
            .and_then(|schema| schema.operations.get(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn base_type<'a>(&'a self, ty: &'a StructuredType) -> Option<&'a StructuredType> {
        self.structured_type(ty.base_type.as_deref()?)
    }

    /// The type followed by its base types, nearest first.
    fn type_chain<'a>(&'a self, ty: &'a StructuredType) -> Vec<&'a StructuredType> {
        let mut chain = vec![ty];
        let mut current = ty;
        while let Some(base) = self.base_type(current) {
            if chain.len() >= MAX_INHERITANCE_DEPTH {
                tracing::warn!(ty = %ty.qualified_name(), "inheritance chain too deep, truncating");
                break;
            }
            chain.push(base);
            current = base;
        }
        chain
    }

    /// Look up an own or inherited property.
    fn property<'a>(&'a self, ty: &'a StructuredType, name: &str) -> Option<PropertyRef<'a>> {
        self.type_chain(ty)
            .into_iter()
            .find_map(|t| t.own_property(name))
    }

    /// All own and inherited properties, base-type properties first.
    fn properties<'a>(&'a self, ty: &'a StructuredType) -> Vec<PropertyRef<'a>> {
        self.type_chain(ty)
            .into_iter()
            .rev()
            .flat_map(|t| {
                t.properties
                    .values()
                    .map(PropertyRef::Structural)
                    .chain(t.navigation_properties.values().map(PropertyRef::Navigation))
            })
            .collect()
    }

    /// Key property names, inherited from the nearest base type that declares them.
    fn key<'a>(&'a self, ty: &'a StructuredType) -> &'a [Name] {
        self.type_chain(ty)
            .into_iter()
            .map(|t| t.key.as_slice())
            .find(|key| !key.is_empty())
            .unwrap_or_default()
    }

    /// Whether `ty` is `base` or one of its subtypes.
    fn derives_from(&self, ty: &StructuredType, base: &str) -> bool {
        self.type_chain(ty)
            .iter()
            .any(|t| t.qualified_name() == base || self.is_alias_of(t, base))
    }

    /// Whether `name` names `ty` through its schema alias.
    fn is_alias_of(&self, ty: &StructuredType, name: &str) -> bool {
        self.structured_type(name)
            .is_some_and(|found| found.qualified_name() == ty.qualified_name())
    }
}
