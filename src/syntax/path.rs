//! Resource path syntax as recognized by the grammar, before resolution.

use std::fmt;

use crate::base::Name;

use super::literal::Literal;

/// A key predicate: `(1)` or `(k1=1,k2='a')`.
///
/// Composite keys keep the order in which the client wrote them; names are
/// unique within one predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPredicate {
    Single(Literal),
    Composite(Vec<(Name, Literal)>),
}

impl KeyPredicate {
    /// Value of a named key component.
    pub fn get(&self, name: &str) -> Option<&Literal> {
        match self {
            Self::Single(_) => None,
            Self::Composite(pairs) => pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Composite(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for KeyPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => write!(f, "({value})"),
            Self::Composite(pairs) => {
                f.write_str("(")?;
                for (idx, (name, value)) in pairs.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Parenthesized arguments following a segment name.
///
/// Whether they form a key predicate or operation parameters is decided by
/// the resolver once it knows what the name refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentArgs {
    /// `()`
    Empty,
    /// `(literal)`
    Single(Literal),
    /// `(name=literal,...)`
    Named(Vec<(Name, Literal)>),
}

impl SegmentArgs {
    pub(crate) fn into_key(self) -> Option<KeyPredicate> {
        match self {
            Self::Empty => None,
            Self::Single(value) => Some(KeyPredicate::Single(value)),
            Self::Named(pairs) => Some(KeyPredicate::Composite(pairs)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawSegment {
    /// A simple or qualified name with optional arguments.
    Named {
        name: Name,
        args: Option<SegmentArgs>,
    },
    /// A second parenthesized group, as in `Fn(p=1)(4)`.
    Key(KeyPredicate),
    /// `$ref`
    Ref,
    /// `$value`
    Value,
    /// `$count`
    Count,
}

impl RawSegment {
    pub fn named(name: impl Into<Name>) -> Self {
        Self::Named {
            name: name.into(),
            args: None,
        }
    }
}

impl fmt::Display for RawSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => {
                f.write_str(name)?;
                match args {
                    None => Ok(()),
                    Some(SegmentArgs::Empty) => f.write_str("()"),
                    Some(SegmentArgs::Single(v)) => write!(f, "({v})"),
                    Some(SegmentArgs::Named(pairs)) => {
                        write!(f, "{}", KeyPredicate::Composite(pairs.clone()))
                    }
                }
            }
            Self::Key(key) => write!(f, "{key}"),
            Self::Ref => f.write_str("$ref"),
            Self::Value => f.write_str("$value"),
            Self::Count => f.write_str("$count"),
        }
    }
}

/// A resource path as written, root-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawPath {
    pub segments: Vec<RawSegment>,
}

impl RawPath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
