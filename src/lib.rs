//! # odata-uri
//!
//! OData v4 request URI parsing: resource paths, query options, the
//! `$filter`/`$orderby` expression AST, and validation against an entity
//! data model.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! engine    → UriParser facade, parse_uri / parse_resource_path
//!   ↓
//! semantic  → Type resolver: paths, keys, operations, expressions, options
//!   ↓
//! uri       → Result model: ODataUri, ResourcePath, Segment, TargetType
//!   ↓
//! parser    → Logos lexer, recursive-descent grammar, SyntaxError
//!   ↓
//! syntax    → Literals, expression AST, raw paths, query options
//!   ↓
//! edm       → EntityDataModel trait, immutable descriptor records
//!   ↓
//! base      → Name, TextRange, protocol constants, identifier rules
//! ```
//!
//! ## Example
//!
//! ```
//! use odata::edm::{Edm, EntityContainer, Schema, StructuredType};
//! use odata::uri::RelativeUri;
//!
//! let model = Edm::builder()
//!     .schema(
//!         Schema::new("Demo").structured_type(
//!             StructuredType::entity("Product")
//!                 .key(["Id"])
//!                 .property("Id", "Edm.Int32")
//!                 .property("Price", "Edm.Decimal"),
//!         ),
//!     )
//!     .container(EntityContainer::new("Service").entity_set("Products", "Demo.Product"))
//!     .build();
//!
//! let parser = odata::UriParser::new(&model);
//! let uri = parser.parse_uri("Products?$filter=Price gt 10&$top=5").unwrap();
//! assert!(matches!(uri.relative_uri, RelativeUri::ResourcePath { .. }));
//! assert_eq!(uri.options().len(), 2);
//! ```

// ============================================================================
// MODULES (dependency order: base → edm → syntax → parser → uri → semantic → engine)
// ============================================================================

/// Foundation types: Name, TextRange, constants
pub mod base;

/// Entity Data Model: descriptor records and the query trait
pub mod edm;

/// Syntax trees: literals, expressions, paths, query options
pub mod syntax;

/// Parser: Logos lexer, grammar rules, syntax errors
pub mod parser;

/// Resolved URI model
pub mod uri;

/// Type resolution and validation against the EDM
pub mod semantic;

pub mod config;
pub mod error;

mod engine;

// Re-export the entry points
pub use config::{FormatAlias, ParserConfig};
pub use engine::{UriParser, parse_resource_path, parse_uri};
pub use error::Error;
pub use parser::SyntaxError;
pub use semantic::ResolveError;
pub use uri::{ODataUri, RelativeUri, ResourcePath, Segment, TargetType};

// Re-export foundation types
pub use base::{Name, TextRange, TextSize};
