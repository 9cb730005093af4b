//! Query options checked against the type a resource path yields.

use tracing::trace;

use super::expr::Scope;
use super::types::{ResolvedType, TypeKind};
use super::{ResolveError, Resolver};
use crate::base::Name;
use crate::base::constants::{COUNT, EXPAND, FILTER, LEVELS, ORDERBY, SELECT, SKIP, TOP};
use crate::edm::{PropertyRef, StructuredType};
use crate::syntax::{Expr, ExpandItem, ExpandKind, ExpandOptions, ExpandTarget, OrderByItem, QueryOption, SelectItem};
use crate::uri::{ResourcePath, Segment};

impl<'m> Resolver<'m> {
    /// Validate query options against the resource `path` addresses.
    ///
    /// `$filter`, `$orderby`, `$top`, `$skip` and `$count` need a collection;
    /// `$select` and `$expand` need structured values. After `/$count` only
    /// `$filter` applies, after `/$ref` no projection does.
    pub fn validate_options(&self, path: &ResourcePath, options: &[QueryOption]) -> Result<(), ResolveError> {
        let target = path
            .query_target()
            .map(|target| ResolvedType::from_target(self.model, &target))
            .transpose()?;
        let counted = matches!(path.segments.last(), Some(Segment::Count));

        for option in options {
            let name = option.name();
            if counted && !matches!(option, QueryOption::Filter(_) | QueryOption::Format(_) | QueryOption::Custom { .. }) {
                return Err(ResolveError::not_applicable(name, COUNT));
            }
            if path.is_ref() && matches!(option, QueryOption::Select(_) | QueryOption::Expand(_)) {
                return Err(ResolveError::not_applicable(name, "$ref"));
            }

            match option {
                QueryOption::Filter(expr) => {
                    let element = require_collection(name, target)?;
                    self.check_filter(expr, element)?;
                }
                QueryOption::OrderBy(items) => {
                    let element = require_collection(name, target)?;
                    self.check_orderby(items, element)?;
                }
                QueryOption::Top(_) | QueryOption::Skip(_) | QueryOption::Count(_) => {
                    require_collection(name, target)?;
                }
                QueryOption::Select(items) => {
                    let ty = require_structured(name, target)?;
                    self.validate_select(ty, items)?;
                }
                QueryOption::Expand(items) => {
                    let ty = require_structured(name, target)?;
                    self.validate_expand(ty, items)?;
                }
                QueryOption::Format(_)
                | QueryOption::Id(_)
                | QueryOption::SkipToken(_)
                | QueryOption::Custom { .. } => {}
            }
            trace!(option = name, "validated query option");
        }
        Ok(())
    }

    fn check_filter(&self, expr: &Expr, element: ResolvedType<'m>) -> Result<(), ResolveError> {
        let ty = self.resolve_expr(expr, &mut Scope::new(element))?;
        if ty.is_boolean() {
            Ok(())
        } else {
            Err(ResolveError::mismatch(FILTER, "Edm.Boolean", ty))
        }
    }

    fn check_orderby(&self, items: &[OrderByItem], element: ResolvedType<'m>) -> Result<(), ResolveError> {
        for item in items {
            let ty = self.resolve_expr(&item.expr, &mut Scope::new(element))?;
            let sortable = !ty.collection && matches!(ty.kind, TypeKind::Primitive(_) | TypeKind::Enum(_) | TypeKind::Untyped);
            if !sortable {
                return Err(ResolveError::mismatch(ORDERBY, "a primitive value", ty));
            }
        }
        Ok(())
    }

    fn validate_select(&self, ty: &'m StructuredType, items: &[SelectItem]) -> Result<(), ResolveError> {
        for item in items {
            let SelectItem::Path(names) = item else {
                continue;
            };
            let mut current = ResolvedType::structured(ty, false);
            for name in names {
                current = if name.contains('.') {
                    self.cast(current, name)?
                } else {
                    self.member(current, name)?
                };
            }
        }
        Ok(())
    }

    fn validate_expand(&self, ty: &'m StructuredType, items: &[ExpandItem]) -> Result<(), ResolveError> {
        for item in items {
            let names = match &item.target {
                ExpandTarget::All => {
                    let only_levels = ExpandOptions {
                        levels: None,
                        ..item.options.clone()
                    };
                    if !only_levels.is_empty() {
                        return Err(ResolveError::not_applicable("nested options other than $levels", "$expand=*"));
                    }
                    continue;
                }
                ExpandTarget::Path(names) => names,
            };
            let target = self.expand_target(ty, names)?;
            self.validate_expand_options(target, item.kind, &item.options)?;
        }
        Ok(())
    }

    /// Walk `Complex/.../Nav[/NS.Type]` and return the navigation target.
    fn expand_target(&self, ty: &'m StructuredType, names: &[Name]) -> Result<ResolvedType<'m>, ResolveError> {
        let mut current = ResolvedType::structured(ty, false);
        let mut navigated = false;
        for name in names {
            if name.contains('.') {
                current = self.cast(current, name)?;
                continue;
            }
            if navigated {
                return Err(ResolveError::SegmentNotAllowed {
                    segment: name.to_string(),
                });
            }
            let owner = match current.as_structured() {
                Some(owner) if !current.collection => owner,
                _ => {
                    return Err(ResolveError::mismatch(
                        format!("{EXPAND} path segment '{name}'"),
                        "a single structured value",
                        current,
                    ));
                }
            };
            current = match self.model.property(owner, name) {
                Some(PropertyRef::Navigation(nav)) => {
                    navigated = true;
                    ResolvedType::structured(self.entity_type(&nav.target.name)?, nav.target.collection)
                }
                Some(PropertyRef::Structural(property)) => ResolvedType::from_type_ref(self.model, &property.ty)?,
                None => {
                    return Err(ResolveError::UnknownProperty {
                        type_name: owner.qualified_name(),
                        name: name.clone(),
                    });
                }
            };
        }
        if !navigated {
            let name = names.last().cloned().unwrap_or_default();
            return Err(ResolveError::NotANavigationProperty {
                type_name: ty.qualified_name(),
                name,
            });
        }
        Ok(current)
    }

    fn validate_expand_options(
        &self,
        target: ResolvedType<'m>,
        kind: ExpandKind,
        options: &ExpandOptions,
    ) -> Result<(), ResolveError> {
        let as_target = match kind {
            ExpandKind::Entities => target.to_string(),
            ExpandKind::Ref => "$ref".to_string(),
            ExpandKind::Count => COUNT.to_string(),
        };
        if kind != ExpandKind::Entities {
            let projection = [
                (options.select.is_some(), SELECT),
                (options.expand.is_some(), EXPAND),
                (options.levels.is_some(), LEVELS),
            ];
            if let Some((_, option)) = projection.into_iter().find(|(present, _)| *present) {
                return Err(ResolveError::not_applicable(option, &as_target));
            }
        }
        if kind == ExpandKind::Count && !target.collection {
            return Err(ResolveError::NotACollection {
                name: target.type_name(),
            });
        }

        let element = target.element();
        let paging = [
            (options.order_by.is_some(), ORDERBY),
            (options.top.is_some(), TOP),
            (options.skip.is_some(), SKIP),
            (options.count.is_some(), COUNT),
        ];
        for (present, option) in paging {
            if present && (kind == ExpandKind::Count || !target.collection) {
                return Err(ResolveError::not_applicable(option, &as_target));
            }
        }
        if let Some(filter) = &options.filter {
            if !target.collection {
                return Err(ResolveError::not_applicable(FILTER, &as_target));
            }
            self.check_filter(filter, element)?;
        }
        if let Some(order_by) = &options.order_by {
            self.check_orderby(order_by, element)?;
        }

        let Some(nested) = element.as_structured() else {
            return Ok(());
        };
        if let Some(select) = &options.select {
            self.validate_select(nested, select)?;
        }
        if let Some(expand) = &options.expand {
            self.validate_expand(nested, expand)?;
        }
        Ok(())
    }
}

fn require_collection<'m>(option: &str, target: Option<ResolvedType<'m>>) -> Result<ResolvedType<'m>, ResolveError> {
    match target {
        Some(ty) if ty.collection => Ok(ty.element()),
        Some(ty) => Err(ResolveError::not_applicable(option, ty)),
        None => Err(ResolveError::not_applicable(option, "a resource without a result")),
    }
}

fn require_structured<'m>(option: &str, target: Option<ResolvedType<'m>>) -> Result<&'m StructuredType, ResolveError> {
    match target {
        Some(ty) => ty
            .as_structured()
            .ok_or_else(|| ResolveError::not_applicable(option, ty)),
        None => Err(ResolveError::not_applicable(option, "a resource without a result")),
    }
}
