//! Reserved words of the OData URL conventions.

/// Namespace of the built-in primitive types.
pub const EDM_NAMESPACE: &str = "Edm";
/// Prefix of every qualified primitive type name.
pub const EDM_NAMESPACE_PREFIX: &str = "Edm.";

/// Path segment addressing the metadata document.
pub const METADATA: &str = "$metadata";
/// Path segment addressing an entity reference.
pub const REF: &str = "$ref";
/// Path segment addressing the raw value of a property or media entity.
pub const VALUE: &str = "$value";
/// Path segment addressing the size of a collection.
pub const COUNT: &str = "$count";
/// The instance currently being filtered.
pub const IT: &str = "$it";
/// Absolute resource path root inside expressions.
pub const ROOT: &str = "$root";

// System query options
pub const FILTER: &str = "$filter";
pub const EXPAND: &str = "$expand";
pub const SELECT: &str = "$select";
pub const ORDERBY: &str = "$orderby";
pub const TOP: &str = "$top";
pub const SKIP: &str = "$skip";
pub const FORMAT: &str = "$format";
pub const ID: &str = "$id";
pub const SKIPTOKEN: &str = "$skiptoken";
pub const LEVELS: &str = "$levels";

/// All system query options accepted at the top level of a request.
pub const SYSTEM_QUERY_OPTIONS: &[&str] = &[
    FILTER, EXPAND, SELECT, ORDERBY, TOP, SKIP, COUNT, FORMAT, ID, SKIPTOKEN,
];

// Media types for the `$format` aliases
pub const MEDIA_TYPE_JSON: &str = "application/json";
pub const MEDIA_TYPE_XML: &str = "application/xml";
pub const MEDIA_TYPE_ATOM: &str = "application/atom+xml";
