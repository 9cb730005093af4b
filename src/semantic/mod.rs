//! Type Resolver / Validator
//!
//! Walks syntax trees against an [`EntityDataModel`] and rejects what the
//! grammar alone cannot: unknown names, incomplete keys, bindings that do not
//! fit, and operands or arguments of the wrong type.
//!
//! ## Passes
//!
//! ```text
//! RawPath      ──► resolve_path        ──► ResourcePath (segments + TargetType)
//! Expr         ──► resolve_expression  ──► TargetType of the expression
//! QueryOption* ──► validate_options    ──► checked against the path's target
//! ```
//!
//! Resolution is single pass with no retries; the first failure is returned.
//! A [`Resolver`] only borrows the model, so any number of them can run
//! concurrently against one shared model.

mod bindings;
mod error;
mod expr;
mod methods;
mod options;
mod path;
mod types;

pub use error::ResolveError;

use crate::base::Name;
use crate::edm::{EntityDataModel, StructuredType, TypeRef};
use crate::syntax::{KeyPredicate, Literal, SegmentArgs};

use types::literal_fits;

/// Resolves syntax against one model.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'m> {
    model: &'m dyn EntityDataModel,
}

impl<'m> Resolver<'m> {
    pub fn new(model: &'m dyn EntityDataModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'m dyn EntityDataModel {
        self.model
    }

    /// Look up an entity type by qualified name.
    fn entity_type(&self, name: &str) -> Result<&'m StructuredType, ResolveError> {
        self.model
            .structured_type(name)
            .filter(|ty| ty.is_entity())
            .ok_or_else(|| ResolveError::UnknownType { name: Name::new(name) })
    }

    fn is_open(&self, ty: &'m StructuredType) -> bool {
        self.model.type_chain(ty).iter().any(|t| t.is_open)
    }

    fn has_stream(&self, ty: &'m StructuredType) -> bool {
        self.model.type_chain(ty).iter().any(|t| t.has_stream)
    }

    /// Check a literal written in the path against a declared type.
    ///
    /// `null` passes here; callers decide whether the slot is nullable.
    fn check_literal(&self, value: &Literal, ty: &TypeRef, context: &str) -> Result<(), ResolveError> {
        if value.is_null() {
            return Ok(());
        }
        if ty.collection {
            return Err(ResolveError::mismatch(context, ty.to_string(), describe_literal(value)));
        }
        if let Some(kind) = ty.primitive() {
            return if literal_fits(value, kind) {
                Ok(())
            } else {
                Err(ResolveError::mismatch(context, ty.to_string(), describe_literal(value)))
            };
        }

        let Some(enum_type) = self.model.enum_type(&ty.name) else {
            return Err(ResolveError::mismatch(context, ty.to_string(), describe_literal(value)));
        };
        let Literal::Enum(literal) = value else {
            return Err(ResolveError::mismatch(context, ty.to_string(), describe_literal(value)));
        };
        let same_type = self
            .model
            .enum_type(&literal.type_name)
            .is_some_and(|found| found.qualified_name() == enum_type.qualified_name());
        if !same_type {
            return Err(ResolveError::mismatch(context, ty.to_string(), &literal.type_name));
        }
        self.check_enum_members(enum_type, &literal.members)
    }

    fn check_enum_members(&self, ty: &crate::edm::EnumType, members: &[Name]) -> Result<(), ResolveError> {
        if members.len() > 1 && !ty.is_flags {
            return Err(ResolveError::mismatch(
                "enum value",
                format!("one member of {}", ty.qualified_name()),
                members.join(","),
            ));
        }
        match members.iter().find(|m| !ty.members.contains_key(m.as_str())) {
            Some(member) => Err(ResolveError::UnknownEnumMember {
                type_name: ty.qualified_name(),
                member: member.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn key_args(key: &KeyPredicate) -> SegmentArgs {
    match key {
        KeyPredicate::Single(value) => SegmentArgs::Single(value.clone()),
        KeyPredicate::Composite(pairs) => SegmentArgs::Named(pairs.clone()),
    }
}

/// Type name of a literal for error messages.
fn describe_literal(value: &Literal) -> String {
    match value {
        Literal::Null => "null".to_string(),
        Literal::Enum(e) => e.type_name.to_string(),
        other => other
            .primitive_kind()
            .map(|kind| kind.qualified_name().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
pub(crate) mod fixture;
