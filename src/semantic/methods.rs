//! Argument and return types of the built-in functions.
//!
//! Arity is already enforced by the grammar; it is checked again here so that
//! hand-built trees get the same treatment.

use std::fmt;

use super::ResolveError;
use super::types::ResolvedType;
use crate::base::Name;
use crate::edm::PrimitiveKind;
use crate::syntax::Method;

/// What an argument position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    String,
    Integer,
    Numeric,
    /// `Edm.Date` or `Edm.DateTimeOffset`
    DateLike,
    /// `Edm.TimeOfDay` or `Edm.DateTimeOffset`
    TimeLike,
    DateTimeOffset,
    Duration,
    Point,
    LineString,
    Polygon,
}

impl ParamKind {
    fn accepts(self, kind: PrimitiveKind) -> bool {
        use PrimitiveKind as P;
        match self {
            Self::String => kind == P::String,
            Self::Integer => kind.is_integral(),
            Self::Numeric => kind.is_numeric(),
            Self::DateLike => matches!(kind, P::Date | P::DateTimeOffset),
            Self::TimeLike => matches!(kind, P::TimeOfDay | P::DateTimeOffset),
            Self::DateTimeOffset => kind == P::DateTimeOffset,
            Self::Duration => kind == P::Duration,
            Self::Point => matches!(kind, P::GeographyPoint | P::GeometryPoint),
            Self::LineString => matches!(kind, P::GeographyLineString | P::GeometryLineString),
            Self::Polygon => matches!(kind, P::GeographyPolygon | P::GeometryPolygon),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "Edm.String",
            Self::Integer => "an integer",
            Self::Numeric => "a number",
            Self::DateLike => "Edm.Date or Edm.DateTimeOffset",
            Self::TimeLike => "Edm.TimeOfDay or Edm.DateTimeOffset",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::Duration => "Edm.Duration",
            Self::Point => "a spatial point",
            Self::LineString => "a spatial line string",
            Self::Polygon => "a spatial polygon",
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Returns {
    Fixed(PrimitiveKind),
    SameAsFirst,
}

fn signature(method: Method) -> (&'static [ParamKind], Returns) {
    use Method as M;
    use ParamKind as K;
    use PrimitiveKind as P;
    match method {
        M::Length => (&[K::String], Returns::Fixed(P::Int32)),
        M::IndexOf => (&[K::String, K::String], Returns::Fixed(P::Int32)),
        M::Substring => (&[K::String, K::Integer, K::Integer], Returns::Fixed(P::String)),
        M::ToLower | M::ToUpper | M::Trim => (&[K::String], Returns::Fixed(P::String)),
        M::Concat => (&[K::String, K::String], Returns::Fixed(P::String)),
        M::StartsWith | M::EndsWith | M::Contains => (&[K::String, K::String], Returns::Fixed(P::Boolean)),
        M::Year | M::Month | M::Day => (&[K::DateLike], Returns::Fixed(P::Int32)),
        M::Hour | M::Minute | M::Second => (&[K::TimeLike], Returns::Fixed(P::Int32)),
        M::FractionalSeconds => (&[K::TimeLike], Returns::Fixed(P::Decimal)),
        M::TotalSeconds => (&[K::Duration], Returns::Fixed(P::Decimal)),
        M::Date => (&[K::DateTimeOffset], Returns::Fixed(P::Date)),
        M::Time => (&[K::DateTimeOffset], Returns::Fixed(P::TimeOfDay)),
        M::TotalOffsetMinutes => (&[K::DateTimeOffset], Returns::Fixed(P::Int32)),
        M::MinDateTime | M::MaxDateTime | M::Now => (&[], Returns::Fixed(P::DateTimeOffset)),
        M::Round | M::Floor | M::Ceiling => (&[K::Numeric], Returns::SameAsFirst),
        M::GeoDistance => (&[K::Point, K::Point], Returns::Fixed(P::Double)),
        M::GeoLength => (&[K::LineString], Returns::Fixed(P::Double)),
        M::GeoIntersects => (&[K::Point, K::Polygon], Returns::Fixed(P::Boolean)),
    }
}

/// Check resolved argument types of a call and compute its result type.
///
/// Untyped arguments (`null`, dynamic properties) are accepted anywhere.
pub(crate) fn check_call<'m>(method: Method, args: &[ResolvedType<'m>]) -> Result<ResolvedType<'m>, ResolveError> {
    let arity = method.arity();
    if !arity.contains(&args.len()) {
        let expected = if arity.start() == arity.end() {
            arity.start().to_string()
        } else {
            format!("{} to {}", arity.start(), arity.end())
        };
        return Err(ResolveError::ArityMismatch {
            method: Name::new_static(method.name()),
            expected,
            found: args.len(),
        });
    }

    let (params, returns) = signature(method);
    for (idx, (param, arg)) in params.iter().zip(args).enumerate() {
        if arg.is_untyped() {
            continue;
        }
        if !arg.as_primitive().is_some_and(|kind| param.accepts(kind)) {
            return Err(ResolveError::mismatch(
                format!("argument {} of {method}", idx + 1),
                param.to_string(),
                arg,
            ));
        }
    }

    Ok(match returns {
        Returns::Fixed(kind) => ResolvedType::primitive(kind),
        Returns::SameAsFirst => args.first().copied().unwrap_or_else(ResolvedType::untyped),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn p(kind: PrimitiveKind) -> ResolvedType<'static> {
        ResolvedType::primitive(kind)
    }

    #[rstest]
    #[case(Method::Length, vec![p(PrimitiveKind::String)], PrimitiveKind::Int32)]
    #[case(Method::Substring, vec![p(PrimitiveKind::String), p(PrimitiveKind::Int32)], PrimitiveKind::String)]
    #[case(Method::Substring, vec![p(PrimitiveKind::String), p(PrimitiveKind::Int32), p(PrimitiveKind::Int64)], PrimitiveKind::String)]
    #[case(Method::StartsWith, vec![p(PrimitiveKind::String), p(PrimitiveKind::String)], PrimitiveKind::Boolean)]
    #[case(Method::Year, vec![p(PrimitiveKind::Date)], PrimitiveKind::Int32)]
    #[case(Method::Year, vec![p(PrimitiveKind::DateTimeOffset)], PrimitiveKind::Int32)]
    #[case(Method::Hour, vec![p(PrimitiveKind::TimeOfDay)], PrimitiveKind::Int32)]
    #[case(Method::TotalSeconds, vec![p(PrimitiveKind::Duration)], PrimitiveKind::Decimal)]
    #[case(Method::Now, vec![], PrimitiveKind::DateTimeOffset)]
    #[case(Method::Round, vec![p(PrimitiveKind::Double)], PrimitiveKind::Double)]
    #[case(Method::Floor, vec![p(PrimitiveKind::Decimal)], PrimitiveKind::Decimal)]
    #[case(Method::GeoDistance, vec![p(PrimitiveKind::GeographyPoint), p(PrimitiveKind::GeographyPoint)], PrimitiveKind::Double)]
    #[case(Method::GeoLength, vec![p(PrimitiveKind::GeometryLineString)], PrimitiveKind::Double)]
    #[case(Method::GeoIntersects, vec![p(PrimitiveKind::GeographyPoint), p(PrimitiveKind::GeographyPolygon)], PrimitiveKind::Boolean)]
    fn test_accepted_calls(#[case] method: Method, #[case] args: Vec<ResolvedType<'static>>, #[case] returns: PrimitiveKind) {
        let result = check_call(method, &args).unwrap();
        assert_eq!(result.as_primitive(), Some(returns));
    }

    #[rstest]
    #[case(Method::Contains, vec![p(PrimitiveKind::Int32), p(PrimitiveKind::String)])]
    #[case(Method::Length, vec![p(PrimitiveKind::Int32)])]
    #[case(Method::Year, vec![p(PrimitiveKind::TimeOfDay)])]
    #[case(Method::Substring, vec![p(PrimitiveKind::String), p(PrimitiveKind::Decimal)])]
    #[case(Method::Round, vec![p(PrimitiveKind::String)])]
    #[case(Method::GeoLength, vec![p(PrimitiveKind::GeographyPoint)])]
    fn test_rejected_argument_kinds(#[case] method: Method, #[case] args: Vec<ResolvedType<'static>>) {
        assert!(matches!(
            check_call(method, &args),
            Err(ResolveError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_arity_rechecked() {
        let err = check_call(Method::Substring, &[p(PrimitiveKind::String)]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::ArityMismatch {
                method: Name::new("substring"),
                expected: "2 to 3".into(),
                found: 1,
            }
        );
    }

    #[test]
    fn test_untyped_arguments_pass() {
        let result = check_call(Method::Contains, &[ResolvedType::untyped(), p(PrimitiveKind::String)]).unwrap();
        assert!(result.is_boolean());
    }

    #[test]
    fn test_every_method_has_a_signature() {
        for method in Method::ALL {
            let (params, _) = signature(method);
            assert_eq!(params.len(), *method.arity().end(), "{method}");
        }
    }
}
