//! Query option syntax.

use std::fmt;

use crate::base::Name;

use super::expr::Expr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOption {
    Filter(Expr),
    Expand(Vec<ExpandItem>),
    Select(Vec<SelectItem>),
    OrderBy(Vec<OrderByItem>),
    Top(u64),
    Skip(u64),
    Count(bool),
    Format(Format),
    Id(String),
    SkipToken(String),
    /// A non-system option, passed through untouched.
    Custom { name: String, value: String },
}

impl QueryOption {
    /// The system option name (`$filter`, ...), or the custom name.
    pub fn name(&self) -> &str {
        use crate::base::constants as c;
        match self {
            Self::Filter(_) => c::FILTER,
            Self::Expand(_) => c::EXPAND,
            Self::Select(_) => c::SELECT,
            Self::OrderBy(_) => c::ORDERBY,
            Self::Top(_) => c::TOP,
            Self::Skip(_) => c::SKIP,
            Self::Count(_) => c::COUNT,
            Self::Format(_) => c::FORMAT,
            Self::Id(_) => c::ID,
            Self::SkipToken(_) => c::SKIPTOKEN,
            Self::Custom { name, .. } => name,
        }
    }
}

/// One `$select` item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// `*`
    All,
    /// `Prop`, `Complex/Prop` or `NS.Derived/Prop`.
    Path(Vec<Name>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandTarget {
    /// `*`
    All,
    /// Navigation path, possibly through complex properties and type casts.
    Path(Vec<Name>),
}

/// What an expanded navigation property yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpandKind {
    #[default]
    Entities,
    /// `Nav/$ref`
    Ref,
    /// `Nav/$count`
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Levels {
    Max,
    Depth(u32),
}

/// Options nested inside an `$expand` item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    pub filter: Option<Expr>,
    pub select: Option<Vec<SelectItem>>,
    pub expand: Option<Vec<ExpandItem>>,
    pub order_by: Option<Vec<OrderByItem>>,
    pub top: Option<u64>,
    pub skip: Option<u64>,
    pub count: Option<bool>,
    pub levels: Option<Levels>,
}

impl ExpandOptions {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandItem {
    pub target: ExpandTarget,
    pub kind: ExpandKind,
    pub options: ExpandOptions,
}

/// A validated `$format` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// The value as the client wrote it, e.g. `json`.
    pub requested: String,
    /// The media type it stands for, e.g. `application/json`.
    pub media_type: String,
    /// Media type parameters after `;`, if any.
    pub parameters: Option<String>,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parameters {
            Some(params) => write!(f, "{};{params}", self.media_type),
            None => f.write_str(&self.media_type),
        }
    }
}
