//! The entity container: what is addressable at the service root.

use indexmap::IndexMap;

use crate::base::Name;

use super::operations::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    pub name: Name,
    /// Qualified name of the element entity type.
    pub entity_type: Name,
    pub include_in_service_document: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Singleton {
    pub name: Name,
    pub entity_type: Name,
}

/// A function import or action import exposing an unbound operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationImport {
    pub kind: OperationKind,
    pub name: Name,
    /// Qualified name of the imported operation.
    pub operation: Name,
}

/// A member of the entity container, as returned by name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerMember<'a> {
    EntitySet(&'a EntitySet),
    Singleton(&'a Singleton),
    OperationImport(&'a OperationImport),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityContainer {
    pub name: Name,
    pub entity_sets: IndexMap<Name, EntitySet>,
    pub singletons: IndexMap<Name, Singleton>,
    pub operation_imports: IndexMap<Name, OperationImport>,
}

impl EntityContainer {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn entity_set(mut self, name: impl Into<Name>, entity_type: impl Into<Name>) -> Self {
        let name = name.into();
        self.entity_sets.insert(
            name.clone(),
            EntitySet {
                name,
                entity_type: entity_type.into(),
                include_in_service_document: true,
            },
        );
        self
    }

    pub fn singleton(mut self, name: impl Into<Name>, entity_type: impl Into<Name>) -> Self {
        let name = name.into();
        self.singletons.insert(
            name.clone(),
            Singleton {
                name,
                entity_type: entity_type.into(),
            },
        );
        self
    }

    pub fn function_import(self, name: impl Into<Name>, function: impl Into<Name>) -> Self {
        self.operation_import(OperationKind::Function, name, function)
    }

    pub fn action_import(self, name: impl Into<Name>, action: impl Into<Name>) -> Self {
        self.operation_import(OperationKind::Action, name, action)
    }

    fn operation_import(
        mut self,
        kind: OperationKind,
        name: impl Into<Name>,
        operation: impl Into<Name>,
    ) -> Self {
        let name = name.into();
        self.operation_imports.insert(
            name.clone(),
            OperationImport {
                kind,
                name,
                operation: operation.into(),
            },
        );
        self
    }

    pub fn member(&self, name: &str) -> Option<ContainerMember<'_>> {
        if let Some(set) = self.entity_sets.get(name) {
            return Some(ContainerMember::EntitySet(set));
        }
        if let Some(singleton) = self.singletons.get(name) {
            return Some(ContainerMember::Singleton(singleton));
        }
        self.operation_imports
            .get(name)
            .map(ContainerMember::OperationImport)
    }
}
