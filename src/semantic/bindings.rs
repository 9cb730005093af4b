//! Key predicates and operation parameters.

use tracing::trace;

use super::types::{ResolvedType, TypeKind};
use super::{ResolveError, Resolver};
use crate::base::{Name, split_qualified_name};
use crate::edm::{Operation, OperationKind, PropertyRef, StructuredType, TypeRef};
use crate::syntax::{KeyPredicate, Literal, SegmentArgs};

impl<'m> Resolver<'m> {
    /// Match a key predicate against the key of `entity`.
    ///
    /// A single value addresses single-property keys only; named components
    /// must name every key property exactly once.
    pub(crate) fn bind_key(&self, entity: &'m StructuredType, args: &SegmentArgs) -> Result<KeyPredicate, ResolveError> {
        let type_name = entity.qualified_name();
        let key = self.model.key(entity);
        if key.is_empty() {
            return Err(ResolveError::KeyNotAllowed { segment: type_name });
        }

        match args {
            SegmentArgs::Empty => Err(ResolveError::IncompleteKey {
                type_name,
                missing: key.to_vec(),
            }),
            SegmentArgs::Single(value) => {
                if let [name] = key {
                    self.check_key_value(entity, name, value)?;
                    Ok(KeyPredicate::Single(value.clone()))
                } else {
                    Err(ResolveError::IncompleteKey {
                        type_name,
                        missing: key.to_vec(),
                    })
                }
            }
            SegmentArgs::Named(pairs) => {
                if let Some((name, _)) = pairs.iter().find(|(name, _)| !key.contains(name)) {
                    return Err(ResolveError::UnexpectedKeyProperty {
                        type_name,
                        name: name.clone(),
                    });
                }
                let missing: Vec<Name> = key
                    .iter()
                    .filter(|k| !pairs.iter().any(|(name, _)| name == *k))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(ResolveError::IncompleteKey { type_name, missing });
                }
                for (name, value) in pairs {
                    self.check_key_value(entity, name, value)?;
                }
                Ok(KeyPredicate::Composite(pairs.clone()))
            }
        }
    }

    fn check_key_value(&self, entity: &'m StructuredType, name: &Name, value: &Literal) -> Result<(), ResolveError> {
        let context = format!("key '{name}'");
        let Some(PropertyRef::Structural(property)) = self.model.property(entity, name) else {
            return Err(ResolveError::UnknownProperty {
                type_name: entity.qualified_name(),
                name: name.clone(),
            });
        };
        if value.is_null() {
            return Err(ResolveError::mismatch(context, property.ty.to_string(), "null"));
        }
        self.check_literal(value, &property.ty, &context)
    }

    /// Bind the arguments written after an operation name to its parameters.
    ///
    /// Actions take their parameters from the request body, so only `()` or
    /// nothing may follow them.
    pub(crate) fn bind_parameters(
        &self,
        operation: &'m Operation,
        args: Option<&SegmentArgs>,
    ) -> Result<Vec<(Name, Literal)>, ResolveError> {
        let qualified = operation.qualified_name();
        let pairs: &[(Name, Literal)] = match args {
            None if operation.kind == OperationKind::Function => {
                return Err(ResolveError::MissingParameter {
                    operation: qualified,
                    name: Name::new_static("()"),
                });
            }
            None | Some(SegmentArgs::Empty) => &[],
            Some(_) if operation.kind == OperationKind::Action => {
                return Err(ResolveError::ActionArguments { operation: qualified });
            }
            Some(SegmentArgs::Single(_)) => {
                return Err(ResolveError::UnnamedParameter { operation: qualified });
            }
            Some(SegmentArgs::Named(pairs)) => pairs.as_slice(),
        };

        let declared = operation.call_parameters();
        for (name, value) in pairs {
            let Some(parameter) = declared.iter().find(|p| p.name == *name) else {
                return Err(ResolveError::UnknownParameter {
                    operation: qualified,
                    name: name.clone(),
                });
            };
            let context = format!("parameter '{name}' of '{qualified}'");
            if value.is_null() && !parameter.nullable {
                return Err(ResolveError::mismatch(context, parameter.ty.to_string(), "null"));
            }
            self.check_literal(value, &parameter.ty, &context)?;
        }

        if operation.kind == OperationKind::Function {
            let missing = declared
                .iter()
                .find(|p| !p.nullable && !pairs.iter().any(|(name, _)| *name == p.name));
            if let Some(parameter) = missing {
                return Err(ResolveError::MissingParameter {
                    operation: qualified,
                    name: parameter.name.clone(),
                });
            }
        }
        Ok(pairs.to_vec())
    }

    /// Pick the first overload whose parameters accept the arguments.
    ///
    /// When none does, the error of the first candidate is reported.
    pub(crate) fn select_overload(
        &self,
        name: &Name,
        candidates: &[&'m Operation],
        args: Option<&SegmentArgs>,
    ) -> Result<(&'m Operation, Vec<(Name, Literal)>), ResolveError> {
        let mut first_error = None;
        for &operation in candidates {
            match self.bind_parameters(operation, args) {
                Ok(parameters) => {
                    trace!(operation = %operation.qualified_name(), "selected overload");
                    return Ok((operation, parameters));
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| {
            let (namespace, simple) = split_qualified_name(name).unwrap_or(("", name.as_str()));
            ResolveError::UnknownOperation {
                namespace: Name::new(namespace),
                name: Name::new(simple),
            }
        }))
    }

    /// Whether a binding parameter of type `binding` accepts `current`.
    pub(crate) fn binds_to(&self, binding: &TypeRef, current: &ResolvedType<'m>) -> bool {
        if binding.collection != current.collection {
            return false;
        }
        match current.kind {
            TypeKind::Structured(ty) => self.model.derives_from(ty, &binding.name),
            TypeKind::Primitive(kind) => binding.primitive() == Some(kind),
            TypeKind::Enum(ty) => self
                .model
                .enum_type(&binding.name)
                .is_some_and(|found| found.qualified_name() == ty.qualified_name()),
            TypeKind::Untyped => false,
        }
    }
}
