//! Expression typing.
//!
//! ```text
//! $it / property / NS.Type / lambda variable ─► walk path ─► ResolvedType
//! literal ─► its primitive kind (enum members checked against their enum)
//! arithmetic ─► numeric promotion, or date/time ± duration
//! comparison, and/or/not, any/all ─► Edm.Boolean
//! method call ─► methods::check_call
//! ```

use super::methods::check_call;
use super::types::{ResolvedType, TypeKind, promote};
use super::{ResolveError, Resolver, key_args};
use crate::base::Name;
use crate::edm::{ContainerMember, PrimitiveKind, PropertyRef};
use crate::syntax::{
    ArithmeticOp, ComparisonOp, EntityRoot, Expr, Lambda, Literal, PathExpr,
};
use crate::uri::TargetType;

/// Names visible while typing an expression.
#[derive(Debug, Clone)]
pub(crate) struct Scope<'m> {
    /// Type of `$it`, the instance being filtered or sorted.
    it: ResolvedType<'m>,
    variables: Vec<(Name, ResolvedType<'m>)>,
}

impl<'m> Scope<'m> {
    pub(crate) fn new(it: ResolvedType<'m>) -> Self {
        Self {
            it,
            variables: Vec::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<ResolvedType<'m>> {
        self.variables
            .iter()
            .rev()
            .find(|(variable, _)| variable == name)
            .map(|(_, ty)| *ty)
    }
}

impl<'m> Resolver<'m> {
    /// Type an expression evaluated against instances of `it`.
    ///
    /// For a collection `it` the expression applies to each element.
    pub fn resolve_expression(&self, expr: &Expr, it: &TargetType) -> Result<TargetType, ResolveError> {
        let it = ResolvedType::from_target(self.model, it)?.element();
        Ok(self.resolve_expr(expr, &mut Scope::new(it))?.target())
    }

    pub(crate) fn resolve_expr(&self, expr: &Expr, scope: &mut Scope<'m>) -> Result<ResolvedType<'m>, ResolveError> {
        match expr {
            Expr::Literal(literal) => self.literal_type(literal),
            Expr::Path(path) => self.resolve_path_expr(path, scope),
            Expr::Arithmetic { op, left, right } => {
                let left = self.resolve_expr(left, scope)?;
                let right = self.resolve_expr(right, scope)?;
                arithmetic_result(*op, left, right)
            }
            Expr::Comparison { op, left, right } => {
                let left = self.resolve_expr(left, scope)?;
                let right = self.resolve_expr(right, scope)?;
                check_comparable(*op, left, right)?;
                Ok(ResolvedType::boolean())
            }
            Expr::And(left, right) | Expr::Or(left, right) => {
                let keyword = if matches!(expr, Expr::And(..)) { "and" } else { "or" };
                for operand in [left, right] {
                    let ty = self.resolve_expr(operand, scope)?;
                    expect_boolean(&format!("operand of '{keyword}'"), ty)?;
                }
                Ok(ResolvedType::boolean())
            }
            Expr::Not(operand) => {
                let ty = self.resolve_expr(operand, scope)?;
                expect_boolean("operand of 'not'", ty)?;
                Ok(ResolvedType::boolean())
            }
            Expr::Negate(operand) => {
                let ty = self.resolve_expr(operand, scope)?;
                match ty.as_primitive() {
                    _ if ty.is_untyped() => Ok(ty),
                    Some(kind) if kind.is_numeric() || kind == PrimitiveKind::Duration => Ok(ty),
                    _ => Err(ResolveError::mismatch("operand of '-'", "a number or duration", ty)),
                }
            }
            Expr::MethodCall(call) | Expr::BoolMethodCall(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.resolve_expr(arg, scope))
                    .collect::<Result<Vec<_>, _>>()?;
                check_call(call.method, &args)
            }
        }
    }

    fn literal_type(&self, literal: &Literal) -> Result<ResolvedType<'m>, ResolveError> {
        let Literal::Enum(value) = literal else {
            return Ok(literal
                .primitive_kind()
                .map_or_else(ResolvedType::untyped, ResolvedType::primitive));
        };
        let ty = self
            .model
            .enum_type(&value.type_name)
            .ok_or_else(|| ResolveError::UnknownType {
                name: value.type_name.clone(),
            })?;
        self.check_enum_members(ty, &value.members)?;
        Ok(ResolvedType {
            kind: TypeKind::Enum(ty),
            collection: false,
        })
    }

    fn resolve_path_expr(&self, path: &PathExpr, scope: &mut Scope<'m>) -> Result<ResolvedType<'m>, ResolveError> {
        let (start, tail) = match path {
            PathExpr::Entity { root, sub_path } => (self.entity_root(root, scope)?, sub_path.as_deref()),
            PathExpr::LambdaVariable { name, sub_path } => {
                let ty = scope
                    .lookup(name)
                    .ok_or_else(|| ResolveError::UnknownLambdaVariable { name: name.clone() })?;
                (ty, sub_path.as_deref())
            }
            _ => return self.walk(scope.it, path, scope),
        };
        match tail {
            Some(tail) => self.walk(start, tail, scope),
            None => Ok(start),
        }
    }

    fn entity_root(&self, root: &EntityRoot, scope: &Scope<'m>) -> Result<ResolvedType<'m>, ResolveError> {
        let EntityRoot::Root { entity_set, key } = root else {
            return Ok(scope.it);
        };
        match (self.model.container().member(entity_set), key) {
            (Some(ContainerMember::EntitySet(set)), key) => {
                let ty = self.entity_type(&set.entity_type)?;
                match key {
                    Some(key) => {
                        self.bind_key(ty, &key_args(key))?;
                        Ok(ResolvedType::structured(ty, false))
                    }
                    None => Ok(ResolvedType::structured(ty, true)),
                }
            }
            (Some(ContainerMember::Singleton(singleton)), None) => {
                Ok(ResolvedType::structured(self.entity_type(&singleton.entity_type)?, false))
            }
            (Some(ContainerMember::Singleton(_)), Some(_)) => Err(ResolveError::KeyNotAllowed {
                segment: entity_set.clone(),
            }),
            _ => Err(ResolveError::UnknownResource {
                name: entity_set.clone(),
            }),
        }
    }

    /// Apply `path` and everything after it to a value of type `current`.
    fn walk(
        &self,
        current: ResolvedType<'m>,
        path: &PathExpr,
        scope: &mut Scope<'m>,
    ) -> Result<ResolvedType<'m>, ResolveError> {
        let next = match path {
            PathExpr::Property { name, .. } => self.member(current, name)?,
            PathExpr::TypeCast { type_name, .. } => self.cast(current, type_name)?,
            PathExpr::Any { lambda } => {
                let element = collection_element(current)?;
                if let Some(lambda) = lambda {
                    self.resolve_lambda(element, lambda, scope)?;
                }
                ResolvedType::boolean()
            }
            PathExpr::All { lambda } => {
                let element = collection_element(current)?;
                self.resolve_lambda(element, lambda, scope)?;
                ResolvedType::boolean()
            }
            PathExpr::Count => {
                collection_element(current)?;
                ResolvedType::primitive(PrimitiveKind::Int32)
            }
            PathExpr::Entity { .. } => {
                return Err(ResolveError::SegmentNotAllowed {
                    segment: "$it".to_string(),
                });
            }
            PathExpr::LambdaVariable { name, .. } => {
                return Err(ResolveError::SegmentNotAllowed {
                    segment: name.to_string(),
                });
            }
        };
        match path.sub_path() {
            Some(tail) => self.walk(next, tail, scope),
            None => Ok(next),
        }
    }

    pub(crate) fn member(&self, current: ResolvedType<'m>, name: &Name) -> Result<ResolvedType<'m>, ResolveError> {
        if current.is_untyped() {
            return Ok(ResolvedType::untyped());
        }
        let ty = match current.as_structured() {
            Some(ty) if !current.collection => ty,
            _ => {
                return Err(ResolveError::mismatch(
                    format!("property '{name}'"),
                    "a single structured value",
                    current,
                ));
            }
        };
        match self.model.property(ty, name) {
            Some(PropertyRef::Navigation(nav)) => Ok(ResolvedType::structured(
                self.entity_type(&nav.target.name)?,
                nav.target.collection,
            )),
            Some(PropertyRef::Structural(property)) => ResolvedType::from_type_ref(self.model, &property.ty),
            None if self.is_open(ty) => Ok(ResolvedType::untyped()),
            None => Err(ResolveError::UnknownProperty {
                type_name: ty.qualified_name(),
                name: name.clone(),
            }),
        }
    }

    pub(crate) fn cast(&self, current: ResolvedType<'m>, type_name: &Name) -> Result<ResolvedType<'m>, ResolveError> {
        let cast = self
            .model
            .structured_type(type_name)
            .ok_or_else(|| ResolveError::UnknownType { name: type_name.clone() })?;
        let fits = current
            .as_structured()
            .is_some_and(|base| self.model.derives_from(cast, &base.qualified_name()));
        if !fits {
            return Err(ResolveError::InvalidTypeCast {
                type_name: type_name.clone(),
                base: current.type_name(),
            });
        }
        Ok(ResolvedType::structured(cast, current.collection))
    }

    fn resolve_lambda(&self, element: ResolvedType<'m>, lambda: &Lambda, scope: &mut Scope<'m>) -> Result<(), ResolveError> {
        scope.variables.push((lambda.variable.clone(), element));
        let result = self.resolve_expr(&lambda.predicate, scope);
        scope.variables.pop();
        expect_boolean(&format!("predicate of lambda '{}'", lambda.variable), result?)
    }
}

fn collection_element(current: ResolvedType<'_>) -> Result<ResolvedType<'_>, ResolveError> {
    if current.is_untyped() {
        return Ok(current);
    }
    if !current.collection {
        return Err(ResolveError::NotACollection {
            name: current.type_name(),
        });
    }
    Ok(current.element())
}

fn expect_boolean(context: &str, ty: ResolvedType<'_>) -> Result<(), ResolveError> {
    if ty.is_boolean() {
        Ok(())
    } else {
        Err(ResolveError::mismatch(context, "Edm.Boolean", ty))
    }
}

fn arithmetic_result<'m>(
    op: ArithmeticOp,
    left: ResolvedType<'m>,
    right: ResolvedType<'m>,
) -> Result<ResolvedType<'m>, ResolveError> {
    use PrimitiveKind as P;
    if left.is_untyped() {
        return Ok(right);
    }
    if right.is_untyped() {
        return Ok(left);
    }
    let mismatch = || {
        ResolveError::mismatch(
            format!("operands of '{}'", op.keyword()),
            "numeric operands",
            format!("{left} and {right}"),
        )
    };
    let (Some(l), Some(r)) = (left.as_primitive(), right.as_primitive()) else {
        return Err(mismatch());
    };
    if l.is_numeric() && r.is_numeric() {
        return Ok(ResolvedType::primitive(promote(l, r)));
    }
    let additive = matches!(op, ArithmeticOp::Add | ArithmeticOp::Sub);
    let result = match (l, r) {
        (P::DateTimeOffset | P::Date, P::Duration) if additive => l,
        (P::Duration, P::Duration) if additive => P::Duration,
        (P::DateTimeOffset, P::DateTimeOffset) | (P::Date, P::Date) if op == ArithmeticOp::Sub => P::Duration,
        _ => return Err(mismatch()),
    };
    Ok(ResolvedType::primitive(result))
}

fn check_comparable(op: ComparisonOp, left: ResolvedType<'_>, right: ResolvedType<'_>) -> Result<(), ResolveError> {
    if left.is_untyped() || right.is_untyped() {
        return Ok(());
    }
    let comparable = match (left.kind, right.kind) {
        _ if left.collection || right.collection => false,
        (TypeKind::Primitive(l), TypeKind::Primitive(r)) => {
            (l.is_numeric() && r.is_numeric()) || (l == r && (op.is_equality() || !l.is_spatial()))
        }
        (TypeKind::Enum(l), TypeKind::Enum(r)) => l.qualified_name() == r.qualified_name(),
        _ => false,
    };
    if comparable {
        Ok(())
    } else {
        Err(ResolveError::mismatch(
            format!("operands of '{}'", op.keyword()),
            format!("a value comparable with {left}"),
            right,
        ))
    }
}
