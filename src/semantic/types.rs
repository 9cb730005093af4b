//! Types as the resolver tracks them while walking a tree.

use std::fmt;

use crate::base::Name;
use crate::edm::{EntityDataModel, EnumType, PrimitiveKind, StructuredType, TypeLookup, TypeRef};
use crate::syntax::Literal;
use crate::uri::TargetType;

use super::ResolveError;

/// Name reported for values whose type the model does not declare.
pub(crate) const UNTYPED: &str = "Edm.Untyped";

#[derive(Debug, Clone, Copy)]
pub(crate) enum TypeKind<'m> {
    Primitive(PrimitiveKind),
    Structured(&'m StructuredType),
    Enum(&'m EnumType),
    /// `null`, or a dynamic property of an open type.
    Untyped,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedType<'m> {
    pub kind: TypeKind<'m>,
    pub collection: bool,
}

impl<'m> ResolvedType<'m> {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self {
            kind: TypeKind::Primitive(kind),
            collection: false,
        }
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Boolean)
    }

    pub fn untyped() -> Self {
        Self {
            kind: TypeKind::Untyped,
            collection: false,
        }
    }

    pub fn structured(ty: &'m StructuredType, collection: bool) -> Self {
        Self {
            kind: TypeKind::Structured(ty),
            collection,
        }
    }

    pub fn element(self) -> Self {
        Self {
            collection: false,
            ..self
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) if !self.collection => Some(kind),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&'m StructuredType> {
        match self.kind {
            TypeKind::Structured(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self.kind, TypeKind::Untyped)
    }

    pub fn is_boolean(&self) -> bool {
        self.is_untyped() || self.as_primitive() == Some(PrimitiveKind::Boolean)
    }

    pub fn is_entity(&self) -> bool {
        self.as_structured().is_some_and(StructuredType::is_entity)
    }

    pub fn type_name(&self) -> Name {
        match self.kind {
            TypeKind::Primitive(kind) => kind.qualified_name(),
            TypeKind::Structured(ty) => ty.qualified_name(),
            TypeKind::Enum(ty) => ty.qualified_name(),
            TypeKind::Untyped => Name::new_static(UNTYPED),
        }
    }

    pub fn target(&self) -> TargetType {
        TargetType {
            type_name: self.type_name(),
            is_collection: self.collection,
        }
    }

    /// Resolve a declared type reference against the model.
    pub fn from_type_ref(model: &'m dyn EntityDataModel, ty: &TypeRef) -> Result<Self, ResolveError> {
        Self::lookup(model, &ty.name, ty.collection)
    }

    pub fn from_target(model: &'m dyn EntityDataModel, target: &TargetType) -> Result<Self, ResolveError> {
        Self::lookup(model, &target.type_name, target.is_collection)
    }

    fn lookup(model: &'m dyn EntityDataModel, name: &str, collection: bool) -> Result<Self, ResolveError> {
        if name == UNTYPED {
            return Ok(Self {
                kind: TypeKind::Untyped,
                collection,
            });
        }
        let (lookup, _) = model
            .resolve_type(name)
            .ok_or_else(|| ResolveError::UnknownType { name: Name::new(name) })?;
        let kind = match lookup {
            TypeLookup::Primitive(kind) => TypeKind::Primitive(kind),
            TypeLookup::Schema(schema_type) => match (schema_type.as_structured(), schema_type.as_enum()) {
                (Some(ty), _) => TypeKind::Structured(ty),
                (_, Some(ty)) => TypeKind::Enum(ty),
                (None, None) => return Err(ResolveError::UnknownType { name: Name::new(name) }),
            },
        };
        Ok(Self { kind, collection })
    }
}

impl fmt::Display for ResolvedType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target())
    }
}

/// Whether `literal` is a valid value of primitive `kind`.
pub(crate) fn literal_fits(literal: &Literal, kind: PrimitiveKind) -> bool {
    match literal {
        Literal::Null => true,
        Literal::Number(_) if kind.is_numeric() => Literal::parse(&literal.to_string(), kind).is_ok(),
        Literal::NonFinite(_) => matches!(kind, PrimitiveKind::Double | PrimitiveKind::Single),
        Literal::Geo(geo) => geo.primitive_kind() == kind,
        Literal::Enum(_) => false,
        other => other.primitive_kind() == Some(kind),
    }
}

/// Numeric promotion for arithmetic results.
pub(crate) fn promote(left: PrimitiveKind, right: PrimitiveKind) -> PrimitiveKind {
    use PrimitiveKind::*;
    let rank = |k: PrimitiveKind| match k {
        Byte | SByte | Int16 | Int32 => 0,
        Int64 => 1,
        Decimal => 2,
        Single => 3,
        _ => 4,
    };
    let widest = if rank(left) >= rank(right) { left } else { right };
    match widest {
        Byte | SByte | Int16 => Int32,
        other => other,
    }
}
