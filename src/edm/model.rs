//! The bundled in-memory EDM.

use rustc_hash::FxHashMap;

use crate::base::Name;

use super::EntityDataModel;
use super::container::EntityContainer;
use super::schema::Schema;

/// An immutable, shareable entity data model.
///
/// Schemas are addressable by namespace and by alias.
#[derive(Debug, Clone, Default)]
pub struct Edm {
    schemas: Vec<Schema>,
    by_name: FxHashMap<Name, usize>,
    container: EntityContainer,
}

impl Edm {
    pub fn builder() -> EdmBuilder {
        EdmBuilder::default()
    }

    pub fn schemas(&self) -> &[Schema] {
        &self.schemas
    }
}

impl EntityDataModel for Edm {
    fn schema(&self, namespace_or_alias: &str) -> Option<&Schema> {
        self.by_name
            .get(namespace_or_alias)
            .and_then(|&idx| self.schemas.get(idx))
    }

    fn container(&self) -> &EntityContainer {
        &self.container
    }
}

/// Collects schemas and the entity container into an [`Edm`].
///
/// No cross-reference validation happens here: a container member may name a
/// type that was never registered, and the resolver reports it when a request
/// touches it.
#[derive(Debug, Clone, Default)]
pub struct EdmBuilder {
    schemas: Vec<Schema>,
    container: EntityContainer,
}

impl EdmBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a schema. A later schema with the same namespace replaces the earlier one.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schemas.retain(|s| s.namespace != schema.namespace);
        self.schemas.push(schema);
        self
    }

    pub fn container(mut self, container: EntityContainer) -> Self {
        self.container = container;
        self
    }

    pub fn build(self) -> Edm {
        let mut by_name = FxHashMap::default();
        for (idx, schema) in self.schemas.iter().enumerate() {
            by_name.insert(schema.namespace.clone(), idx);
            if let Some(alias) = &schema.alias {
                by_name.entry(alias.clone()).or_insert(idx);
            }
        }
        tracing::debug!(
            schemas = self.schemas.len(),
            entity_sets = self.container.entity_sets.len(),
            "built entity data model"
        );
        Edm {
            schemas: self.schemas,
            by_name,
            container: self.container,
        }
    }
}
