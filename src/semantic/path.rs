//! Resource path resolution.
//!
//! Each segment is classified by what the current type says it can be:
//!
//! ```text
//! first segment   entity set | singleton | function/action import
//! Name            navigation or structural property of a single structured value
//! NS.Type         type cast to a derived type
//! NS.Operation    bound action/function whose binding parameter fits the current type
//! $ref            after entities          (terminal)
//! $value          after primitives, media (terminal)
//! $count          after collections       (terminal)
//! ```

use tracing::{debug, trace};

use super::types::{ResolvedType, TypeKind};
use super::{ResolveError, Resolver, key_args};
use crate::base::{Name, split_qualified_name};
use crate::edm::{ContainerMember, OperationImport, PrimitiveKind, PropertyRef};
use crate::syntax::{RawPath, RawSegment, SegmentArgs};
use crate::uri::{ResourcePath, Segment};

/// Where resolution stands after a segment.
#[derive(Debug, Clone)]
struct PathState<'m> {
    /// `None` after an action without a return type.
    current: Option<ResolvedType<'m>>,
    /// Text of the last segment, for error messages.
    last: Name,
    /// Whether a key predicate may address into `current`.
    key_allowed: bool,
    terminal: bool,
}

impl<'m> PathState<'m> {
    fn new(current: ResolvedType<'m>, last: &Name, key_allowed: bool) -> Self {
        Self {
            current: Some(current),
            last: last.clone(),
            key_allowed,
            terminal: false,
        }
    }

    fn terminal(current: Option<ResolvedType<'m>>, last: &Name) -> Self {
        Self {
            current,
            last: last.clone(),
            key_allowed: false,
            terminal: true,
        }
    }
}

impl<'m> Resolver<'m> {
    /// Resolve a resource path against the model.
    pub fn resolve_path(&self, raw: &RawPath) -> Result<ResourcePath, ResolveError> {
        let Some((first, rest)) = raw.segments.split_first() else {
            return Err(ResolveError::EmptyPath);
        };
        let RawSegment::Named { name, args } = first else {
            return Err(ResolveError::SegmentNotAllowed {
                segment: first.to_string(),
            });
        };

        let mut segments = Vec::with_capacity(raw.segments.len() + 1);
        let mut state = self.resolve_root(name, args.as_ref(), &mut segments)?;
        for segment in rest {
            if state.terminal {
                return Err(ResolveError::SegmentAfterTerminal {
                    segment: state.last.to_string(),
                });
            }
            state = self.resolve_segment(state, segment, &mut segments)?;
            trace!(segment = %state.last, "resolved path segment");
        }

        let target = state.current.map(|t| t.target());
        debug!(segments = segments.len(), resolved = ?target, "resolved resource path");
        Ok(ResourcePath { segments, target })
    }

    fn resolve_root(
        &self,
        name: &Name,
        args: Option<&SegmentArgs>,
        segments: &mut Vec<Segment>,
    ) -> Result<PathState<'m>, ResolveError> {
        match self.model.container().member(name) {
            Some(ContainerMember::EntitySet(set)) => {
                let ty = self.entity_type(&set.entity_type)?;
                segments.push(Segment::EntitySet {
                    name: set.name.clone(),
                    entity_type: ty.qualified_name(),
                });
                let state = PathState::new(ResolvedType::structured(ty, true), name, true);
                self.apply_key(state, args, segments)
            }
            Some(ContainerMember::Singleton(singleton)) => {
                let ty = self.entity_type(&singleton.entity_type)?;
                if args.is_some() {
                    return Err(ResolveError::KeyNotAllowed { segment: name.clone() });
                }
                segments.push(Segment::Singleton {
                    name: singleton.name.clone(),
                    entity_type: ty.qualified_name(),
                });
                Ok(PathState::new(ResolvedType::structured(ty, false), name, false))
            }
            Some(ContainerMember::OperationImport(import)) => self.resolve_import(import, args, segments),
            None => Err(ResolveError::UnknownResource { name: name.clone() }),
        }
    }

    fn resolve_segment(
        &self,
        state: PathState<'m>,
        segment: &RawSegment,
        segments: &mut Vec<Segment>,
    ) -> Result<PathState<'m>, ResolveError> {
        let Some(current) = state.current else {
            return Err(ResolveError::SegmentAfterTerminal {
                segment: state.last.to_string(),
            });
        };
        let text = Name::new(segment.to_string());

        match segment {
            RawSegment::Ref => {
                if !current.is_entity() {
                    return Err(ResolveError::SegmentNotAllowed { segment: text.to_string() });
                }
                segments.push(Segment::Ref);
                Ok(PathState::terminal(Some(current), &text))
            }
            RawSegment::Value => {
                let target = match current.kind {
                    _ if current.collection => None,
                    TypeKind::Primitive(_) | TypeKind::Enum(_) => Some(current),
                    TypeKind::Structured(ty) if ty.is_entity() && self.has_stream(ty) => {
                        Some(ResolvedType::primitive(PrimitiveKind::Stream))
                    }
                    _ => None,
                };
                let Some(target) = target else {
                    return Err(ResolveError::SegmentNotAllowed { segment: text.to_string() });
                };
                segments.push(Segment::Value);
                Ok(PathState::terminal(Some(target), &text))
            }
            RawSegment::Count => {
                if !current.collection {
                    return Err(ResolveError::NotACollection { name: state.last });
                }
                segments.push(Segment::Count);
                Ok(PathState::terminal(
                    Some(ResolvedType::primitive(PrimitiveKind::Int32)),
                    &text,
                ))
            }
            RawSegment::Key(key) => {
                let state = PathState {
                    current: Some(current),
                    ..state
                };
                self.apply_key(state, Some(&key_args(key)), segments)
            }
            RawSegment::Named { name, args } if name.contains('.') => {
                self.resolve_qualified(state, current, name, args.as_ref(), segments)
            }
            RawSegment::Named { name, args } => {
                self.resolve_property(state, current, name, args.as_ref(), segments)
            }
        }
    }

    fn resolve_property(
        &self,
        state: PathState<'m>,
        current: ResolvedType<'m>,
        name: &Name,
        args: Option<&SegmentArgs>,
        segments: &mut Vec<Segment>,
    ) -> Result<PathState<'m>, ResolveError> {
        let Some(ty) = current.as_structured() else {
            return Err(ResolveError::UnknownProperty {
                type_name: current.type_name(),
                name: name.clone(),
            });
        };
        if current.collection {
            return Err(ResolveError::KeyRequired {
                segment: state.last,
                next: name.clone(),
            });
        }

        match self.model.property(ty, name) {
            Some(PropertyRef::Navigation(nav)) => {
                let target = ResolvedType::structured(self.entity_type(&nav.target.name)?, nav.target.collection);
                segments.push(Segment::Navigation {
                    name: name.clone(),
                    target: target.target(),
                });
                let state = PathState::new(target, name, target.collection);
                self.apply_key(state, args, segments)
            }
            Some(PropertyRef::Structural(property)) => {
                if args.is_some() {
                    return Err(ResolveError::KeyNotAllowed { segment: name.clone() });
                }
                let target = ResolvedType::from_type_ref(self.model, &property.ty)?;
                segments.push(Segment::Property {
                    name: name.clone(),
                    target: target.target(),
                });
                Ok(PathState::new(target, name, false))
            }
            None if self.is_open(ty) => {
                if args.is_some() {
                    return Err(ResolveError::KeyNotAllowed { segment: name.clone() });
                }
                let target = ResolvedType::untyped();
                segments.push(Segment::Property {
                    name: name.clone(),
                    target: target.target(),
                });
                Ok(PathState::new(target, name, false))
            }
            None => Err(ResolveError::UnknownProperty {
                type_name: ty.qualified_name(),
                name: name.clone(),
            }),
        }
    }

    /// `NS.Name`: a type cast if it names a structured type, else a bound operation.
    fn resolve_qualified(
        &self,
        state: PathState<'m>,
        current: ResolvedType<'m>,
        name: &Name,
        args: Option<&SegmentArgs>,
        segments: &mut Vec<Segment>,
    ) -> Result<PathState<'m>, ResolveError> {
        if let Some(cast) = self.model.structured_type(name) {
            let fits = current
                .as_structured()
                .is_some_and(|base| self.model.derives_from(cast, &base.qualified_name()));
            if !fits {
                return Err(ResolveError::InvalidTypeCast {
                    type_name: name.clone(),
                    base: current.type_name(),
                });
            }
            segments.push(Segment::TypeCast {
                type_name: cast.qualified_name(),
            });
            let next = PathState::new(
                ResolvedType::structured(cast, current.collection),
                name,
                state.key_allowed,
            );
            return self.apply_key(next, args, segments);
        }

        let (namespace, simple) = self.split_operation_name(name)?;
        let overloads = self.model.operations(namespace, simple);
        let bound: Vec<_> = overloads
            .iter()
            .filter(|op| op.binding_parameter().is_some_and(|p| self.binds_to(&p.ty, &current)))
            .collect();
        if bound.is_empty() {
            return Err(ResolveError::BindingMismatch {
                operation: name.clone(),
                found: current.target(),
            });
        }

        let (operation, parameters) = self.select_overload(name, &bound, args)?;
        let target = operation
            .return_type
            .as_ref()
            .map(|ty| ResolvedType::from_type_ref(self.model, ty))
            .transpose()?;
        segments.push(Segment::BoundOperation {
            operation: operation.qualified_name(),
            kind: operation.kind,
            parameters,
            target: target.map(|t| t.target()),
        });
        Ok(operation_state(target, name, operation.is_composable))
    }

    fn resolve_import(
        &self,
        import: &'m OperationImport,
        args: Option<&SegmentArgs>,
        segments: &mut Vec<Segment>,
    ) -> Result<PathState<'m>, ResolveError> {
        let (namespace, simple) = self.split_operation_name(&import.operation)?;
        let unbound: Vec<_> = self
            .model
            .operations(namespace, simple)
            .iter()
            .filter(|op| !op.is_bound && op.kind == import.kind)
            .collect();
        if unbound.is_empty() {
            return Err(ResolveError::UnknownOperation {
                namespace: Name::new(namespace),
                name: Name::new(simple),
            });
        }
        let (operation, parameters) = self.select_overload(&import.operation, &unbound, args)?;
        let target = operation
            .return_type
            .as_ref()
            .map(|ty| ResolvedType::from_type_ref(self.model, ty))
            .transpose()?;
        segments.push(Segment::OperationImport {
            name: import.name.clone(),
            operation: operation.qualified_name(),
            kind: operation.kind,
            parameters,
            target: target.map(|t| t.target()),
        });
        Ok(operation_state(target, &import.name, operation.is_composable))
    }

    /// Split `NS.Name` and check the schema exists and declares the name.
    fn split_operation_name<'n>(&self, name: &'n str) -> Result<(&'n str, &'n str), ResolveError> {
        let (namespace, simple) = split_qualified_name(name).ok_or_else(|| ResolveError::UnknownType {
            name: Name::new(name),
        })?;
        if self.model.schema(namespace).is_none() {
            return Err(ResolveError::UnknownSchema {
                namespace: Name::new(namespace),
            });
        }
        if self.model.operations(namespace, simple).is_empty() {
            return Err(ResolveError::UnknownOperation {
                namespace: Name::new(namespace),
                name: Name::new(simple),
            });
        }
        Ok((namespace, simple))
    }

    /// Attach a key predicate to a collection of entities, if one was written.
    fn apply_key(
        &self,
        state: PathState<'m>,
        args: Option<&SegmentArgs>,
        segments: &mut Vec<Segment>,
    ) -> Result<PathState<'m>, ResolveError> {
        let Some(args) = args else {
            return Ok(state);
        };
        let entity = state
            .current
            .filter(|current| state.key_allowed && current.collection)
            .and_then(|current| current.as_structured())
            .ok_or_else(|| ResolveError::KeyNotAllowed {
                segment: state.last.clone(),
            })?;
        let key = self.bind_key(entity, args)?;
        segments.push(Segment::Key(key));
        Ok(PathState {
            current: state.current.map(ResolvedType::element),
            key_allowed: false,
            ..state
        })
    }
}

fn operation_state<'m>(target: Option<ResolvedType<'m>>, name: &Name, composable: bool) -> PathState<'m> {
    match target {
        Some(target) if composable => PathState::new(target, name, target.collection),
        target => PathState::terminal(target, name),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::edm::{Edm, EntityContainer, OperationKind, Schema, StructuredType};
    use crate::parser::parse_raw_path;
    use crate::semantic::fixture;
    use crate::uri::TargetType;

    fn resolve(text: &str) -> Result<ResourcePath, ResolveError> {
        let model = fixture::model();
        Resolver::new(&model).resolve_path(&parse_raw_path(text).unwrap())
    }

    #[rstest]
    #[case("People", TargetType::collection("Demo.Person"))]
    #[case("People(1)", TargetType::single("Demo.Person"))]
    #[case("People(1)/Friends", TargetType::collection("Demo.Person"))]
    #[case("People(1)/Friends(2)/BestFriend", TargetType::single("Demo.Person"))]
    #[case("People(1)/Name", TargetType::primitive(PrimitiveKind::String))]
    #[case("People(1)/Name/$value", TargetType::primitive(PrimitiveKind::String))]
    #[case("People(1)/Address/City", TargetType::primitive(PrimitiveKind::String))]
    #[case("People(1)/Tags", TargetType::collection("Edm.String"))]
    #[case("People/$count", TargetType::primitive(PrimitiveKind::Int32))]
    #[case("People(1)/Orders/$ref", TargetType::collection("Demo.Order"))]
    #[case("People/Demo.Employee", TargetType::collection("Demo.Employee"))]
    #[case("People/Demo.Employee(3)/Salary", TargetType::primitive(PrimitiveKind::Decimal))]
    #[case("People(3)/D.Employee/Manager", TargetType::single("Demo.Person"))]
    #[case("Me/Orders(5)/Lines(OrderId=5,LineNo=1)", TargetType::single("Demo.OrderLine"))]
    #[case("Photos(01234567-89ab-cdef-0123-456789abcdef)/$value", TargetType::primitive(PrimitiveKind::Stream))]
    #[case("Events(1)/Venue", TargetType::single("Edm.Untyped"))]
    #[case("People(1)/Demo.FriendCount()", TargetType::primitive(PrimitiveKind::Int32))]
    #[case("Orders/Demo.Discounted(percent=10)(4)/Total", TargetType::primitive(PrimitiveKind::Decimal))]
    #[case("Nearest(lat=1.5,lon=2)", TargetType::collection("Demo.Person"))]
    #[case("TopCustomer()/Orders", TargetType::collection("Demo.Order"))]
    #[case("Greeting(name='x',polite=true)", TargetType::primitive(PrimitiveKind::String))]
    fn test_resolved_targets(#[case] path: &str, #[case] expected: TargetType) {
        let resolved = resolve(path).unwrap();
        assert_eq!(resolved.target, Some(expected), "{path}");
    }

    #[test]
    fn test_segments_are_classified() {
        let resolved = resolve("People(1)/Friends/Demo.Employee").unwrap();
        assert!(matches!(resolved.segments[0], Segment::EntitySet { .. }));
        assert!(matches!(resolved.segments[1], Segment::Key(_)));
        assert!(matches!(resolved.segments[2], Segment::Navigation { .. }));
        assert!(matches!(resolved.segments[3], Segment::TypeCast { .. }));
        assert_eq!(resolved.entity_set().map(|n| n.as_str()), Some("People"));
    }

    #[test]
    fn test_action_without_result() {
        let resolved = resolve("People(1)/Demo.Employee/Demo.Promote").unwrap();
        assert_eq!(resolved.target, None);
        let resolved = resolve("ResetData").unwrap();
        assert!(matches!(resolved.segments[0], Segment::OperationImport { kind: OperationKind::Action, .. }));
    }

    #[rstest]
    #[case("Nowhere", "UnknownResource")]
    #[case("People(1)/Shoe", "UnknownProperty")]
    #[case("People/Name", "KeyRequired")]
    #[case("People(1)(2)", "KeyNotAllowed")]
    #[case("Me(1)", "KeyNotAllowed")]
    #[case("People(1)/BestFriend(2)", "KeyNotAllowed")]
    #[case("People(1)/Name(2)", "KeyNotAllowed")]
    #[case("People('x')", "TypeMismatch")]
    #[case("OrderLines(OrderId=1)", "IncompleteKey")]
    #[case("OrderLines(OrderId=1,LineNo=2,Extra=3)", "UnexpectedKeyProperty")]
    #[case("People/Demo.Order", "InvalidTypeCast")]
    #[case("People(1)/Nope.Thing", "UnknownSchema")]
    #[case("People(1)/Demo.Missing()", "UnknownOperation")]
    #[case("People/Demo.FriendCount()", "BindingMismatch")]
    #[case("People(1)/Demo.Promote", "BindingMismatch")]
    #[case("Orders/Demo.Discounted()", "MissingParameter")]
    #[case("People(1)/Demo.FriendCount", "MissingParameter")]
    #[case("TopCustomer", "MissingParameter")]
    #[case("Orders/Demo.Discounted(rate=1)", "UnknownParameter")]
    #[case("Orders/Demo.Discounted(10)", "UnnamedParameter")]
    #[case("ResetData(x=1)", "ActionArguments")]
    #[case("People/$count/Name", "SegmentAfterTerminal")]
    #[case("People(1)/Demo.FriendCount()/Name", "SegmentAfterTerminal")]
    #[case("People(1)/$value", "SegmentNotAllowed")]
    #[case("People(1)/Name/$ref", "SegmentNotAllowed")]
    #[case("People(1)/$count", "NotACollection")]
    #[case("$ref", "SegmentNotAllowed")]
    fn test_rejected_paths(#[case] path: &str, #[case] variant: &str) {
        let err = resolve(path).unwrap_err();
        let debug = format!("{err:?}");
        assert!(debug.starts_with(variant), "{path}: {debug}");
    }

    #[test]
    fn test_missing_entity_type_is_a_resolution_error() {
        let model = Edm::builder()
            .schema(Schema::new("Shop").structured_type(StructuredType::entity("Customer").key(["Id"]).property("Id", "Edm.Int32")))
            .container(EntityContainer::new("Shop").entity_set("Orders", "Shop.Order"))
            .build();
        let raw = parse_raw_path("Orders(1)").unwrap();
        let err = Resolver::new(&model).resolve_path(&raw).unwrap_err();
        assert_eq!(err, ResolveError::UnknownType { name: Name::new("Shop.Order") });
    }

    #[test]
    fn test_empty_path() {
        let model = fixture::model();
        assert_eq!(
            Resolver::new(&model).resolve_path(&RawPath::default()),
            Err(ResolveError::EmptyPath)
        );
    }
}
