//! Expression AST for `$filter`, `$orderby` and lambda predicates.
//!
//! The node set is closed: consumers match exhaustively. Nodes are pure data;
//! evaluation belongs to whoever executes the query.

use std::fmt;
use std::ops::RangeInclusive;

use crate::base::Name;

use super::literal::Literal;
use super::path::KeyPredicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithmeticOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Mod => "mod",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }

    /// `eq` and `ne` apply to every type; the others need an ordering.
    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

/// The built-in query functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // String functions
    Length,
    IndexOf,
    Substring,
    ToLower,
    ToUpper,
    Trim,
    Concat,
    StartsWith,
    EndsWith,
    Contains,
    // Date and time functions
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    FractionalSeconds,
    TotalSeconds,
    Date,
    Time,
    TotalOffsetMinutes,
    MinDateTime,
    MaxDateTime,
    Now,
    // Math functions
    Round,
    Floor,
    Ceiling,
    // Geo functions
    GeoDistance,
    GeoLength,
    GeoIntersects,
}

impl Method {
    pub const ALL: [Method; 30] = [
        Self::Length,
        Self::IndexOf,
        Self::Substring,
        Self::ToLower,
        Self::ToUpper,
        Self::Trim,
        Self::Concat,
        Self::StartsWith,
        Self::EndsWith,
        Self::Contains,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::FractionalSeconds,
        Self::TotalSeconds,
        Self::Date,
        Self::Time,
        Self::TotalOffsetMinutes,
        Self::MinDateTime,
        Self::MaxDateTime,
        Self::Now,
        Self::Round,
        Self::Floor,
        Self::Ceiling,
        Self::GeoDistance,
        Self::GeoLength,
        Self::GeoIntersects,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::IndexOf => "indexof",
            Self::Substring => "substring",
            Self::ToLower => "tolower",
            Self::ToUpper => "toupper",
            Self::Trim => "trim",
            Self::Concat => "concat",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Contains => "contains",
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Minute => "minute",
            Self::Second => "second",
            Self::FractionalSeconds => "fractionalseconds",
            Self::TotalSeconds => "totalseconds",
            Self::Date => "date",
            Self::Time => "time",
            Self::TotalOffsetMinutes => "totaloffsetminutes",
            Self::MinDateTime => "mindatetime",
            Self::MaxDateTime => "maxdatetime",
            Self::Now => "now",
            Self::Round => "round",
            Self::Floor => "floor",
            Self::Ceiling => "ceiling",
            Self::GeoDistance => "geo.distance",
            Self::GeoLength => "geo.length",
            Self::GeoIntersects => "geo.intersects",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Functions usable directly as a predicate.
    pub fn returns_boolean(&self) -> bool {
        matches!(
            self,
            Self::StartsWith | Self::EndsWith | Self::Contains | Self::GeoIntersects
        )
    }

    /// Accepted argument counts.
    pub fn arity(&self) -> RangeInclusive<usize> {
        match self {
            Self::MinDateTime | Self::MaxDateTime | Self::Now => 0..=0,
            Self::Substring => 2..=3,
            Self::IndexOf
            | Self::Concat
            | Self::StartsWith
            | Self::EndsWith
            | Self::Contains
            | Self::GeoDistance
            | Self::GeoIntersects => 2..=2,
            _ => 1..=1,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A call to a built-in function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodCall {
    pub method: Method,
    pub args: Vec<Expr>,
}

/// `variable: predicate` inside `any(...)` / `all(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lambda {
    pub variable: Name,
    pub predicate: Box<Expr>,
}

/// Where an entity path starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRoot {
    /// `$it`, the instance being filtered.
    It,
    /// `$root/EntitySet(key)`.
    Root {
        entity_set: Name,
        key: Option<KeyPredicate>,
    },
}

/// Path expressions; every variant may continue into a sub-path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathExpr {
    Entity {
        root: EntityRoot,
        sub_path: Option<Box<PathExpr>>,
    },
    Property {
        name: Name,
        sub_path: Option<Box<PathExpr>>,
    },
    LambdaVariable {
        name: Name,
        sub_path: Option<Box<PathExpr>>,
    },
    /// `Namespace.Type` segment narrowing the current type.
    TypeCast {
        type_name: Name,
        sub_path: Option<Box<PathExpr>>,
    },
    /// `any()` with no lambda means "collection is non-empty".
    Any { lambda: Option<Lambda> },
    All { lambda: Lambda },
    /// `$count` on a collection.
    Count,
}

impl PathExpr {
    pub fn property(name: impl Into<Name>) -> Self {
        Self::Property {
            name: name.into(),
            sub_path: None,
        }
    }

    pub fn sub_path(&self) -> Option<&PathExpr> {
        match self {
            Self::Entity { sub_path, .. }
            | Self::Property { sub_path, .. }
            | Self::LambdaVariable { sub_path, .. }
            | Self::TypeCast { sub_path, .. } => sub_path.as_deref(),
            Self::Any { .. } | Self::All { .. } | Self::Count => None,
        }
    }

    /// Append `tail` at the end of this path.
    pub(crate) fn append(&mut self, tail: PathExpr) {
        let slot = match self {
            Self::Entity { sub_path, .. }
            | Self::Property { sub_path, .. }
            | Self::LambdaVariable { sub_path, .. }
            | Self::TypeCast { sub_path, .. } => sub_path,
            Self::Any { .. } | Self::All { .. } | Self::Count => return,
        };
        match slot {
            Some(next) => next.append(tail),
            None => *slot = Some(Box::new(tail)),
        }
    }

    /// Whether the path ends in a segment that cannot be continued.
    pub fn is_terminated(&self) -> bool {
        match self.sub_path() {
            Some(next) => next.is_terminated(),
            None => matches!(self, Self::Any { .. } | Self::All { .. } | Self::Count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    Path(PathExpr),
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    /// Unary `-`.
    Negate(Box<Expr>),
    MethodCall(MethodCall),
    /// A call to a boolean-returning function, valid wherever a predicate is.
    BoolMethodCall(MethodCall),
}

impl Expr {
    pub fn arithmetic(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        Self::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn comparison(op: ComparisonOp, left: Expr, right: Expr) -> Self {
        Self::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub fn not(operand: Expr) -> Self {
        Self::Not(Box::new(operand))
    }

    /// Build a call node, choosing the boolean specialization where it applies.
    pub fn call(method: Method, args: Vec<Expr>) -> Self {
        let call = MethodCall { method, args };
        if method.returns_boolean() {
            Self::BoolMethodCall(call)
        } else {
            Self::MethodCall(call)
        }
    }

    /// Direct child expressions, left to right.
    ///
    /// Lambda predicates count as children of the path that carries them.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Literal(_) => Vec::new(),
            Self::Path(path) => {
                let mut out = Vec::new();
                let mut current = Some(path);
                while let Some(p) = current {
                    match p {
                        PathExpr::Any {
                            lambda: Some(lambda),
                        }
                        | PathExpr::All { lambda } => out.push(lambda.predicate.as_ref()),
                        _ => {}
                    }
                    current = p.sub_path();
                }
                out
            }
            Self::Arithmetic { left, right, .. }
            | Self::Comparison { left, right, .. }
            | Self::And(left, right)
            | Self::Or(left, right) => vec![left.as_ref(), right.as_ref()],
            Self::Not(operand) | Self::Negate(operand) => vec![operand.as_ref()],
            Self::MethodCall(call) | Self::BoolMethodCall(call) => call.args.iter().collect(),
        }
    }

    pub fn as_path(&self) -> Option<&PathExpr> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}
