//! Schemas group types and operations under a namespace.

use indexmap::IndexMap;

use crate::base::Name;

use super::operations::Operation;
use super::types::{EnumType, SchemaType, StructuredType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub namespace: Name,
    pub alias: Option<Name>,
    pub types: IndexMap<Name, SchemaType>,
    /// Overloads grouped by simple name.
    pub operations: IndexMap<Name, Vec<Operation>>,
}

impl Schema {
    pub fn new(namespace: impl Into<Name>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<Name>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add an entity or complex type.
    pub fn structured_type(mut self, mut ty: StructuredType) -> Self {
        ty.namespace = self.namespace.clone();
        self.types.insert(ty.name.clone(), SchemaType::Structured(ty));
        self
    }

    pub fn enum_type(mut self, mut ty: EnumType) -> Self {
        ty.namespace = self.namespace.clone();
        self.types.insert(ty.name.clone(), SchemaType::Enum(ty));
        self
    }

    pub fn operation(mut self, mut operation: Operation) -> Self {
        operation.namespace = self.namespace.clone();
        self.operations
            .entry(operation.name.clone())
            .or_default()
            .push(operation);
        self
    }
}
