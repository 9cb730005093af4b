//! Syntax: the trees the grammar builds.
//!
//! - [`literal`] - Literal Model: typed values and their URL spelling
//! - [`expr`] - Expression AST for `$filter` / `$orderby`
//! - [`path`] - Resource path segments as written, and key predicates
//! - [`query`] - Query options
//!
//! Everything here is request-scoped, immutable once built, and carries no
//! references into the EDM.

pub mod expr;
pub mod literal;
pub mod path;
pub mod query;

pub use expr::{ArithmeticOp, ComparisonOp, EntityRoot, Expr, Lambda, Method, MethodCall, PathExpr};
pub use literal::{Duration, EnumLiteral, GeoLiteral, GeoShape, GeoSpace, Literal, LiteralFormatError, NonFinite};
pub use path::{KeyPredicate, RawPath, RawSegment, SegmentArgs};
pub use query::{
    ExpandItem, ExpandKind, ExpandOptions, ExpandTarget, Format, Levels, OrderByItem, QueryOption,
    SelectItem, SortDirection,
};
