//! Resolution errors: valid syntax that does not fit the model.

use thiserror::Error;

use crate::base::Name;
use crate::uri::TargetType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("resource path is empty")]
    EmptyPath,

    #[error("no entity set, singleton or function import named '{name}'")]
    UnknownResource { name: Name },

    #[error("unknown type '{name}'")]
    UnknownType { name: Name },

    #[error("type '{type_name}' has no property '{name}'")]
    UnknownProperty { type_name: Name, name: Name },

    #[error("no schema with namespace or alias '{namespace}'")]
    UnknownSchema { namespace: Name },

    #[error("schema '{namespace}' has no action or function '{name}'")]
    UnknownOperation { namespace: Name, name: Name },

    #[error("'{operation}' cannot be bound to {found}")]
    BindingMismatch { operation: Name, found: TargetType },

    #[error("'{operation}' has no parameter '{name}'")]
    UnknownParameter { operation: Name, name: Name },

    #[error("'{operation}' requires parameter '{name}'")]
    MissingParameter { operation: Name, name: Name },

    #[error("parameters of '{operation}' must be written as name=value")]
    UnnamedParameter { operation: Name },

    #[error("action '{operation}' takes its parameters from the request body")]
    ActionArguments { operation: Name },

    #[error("key of '{type_name}' is missing {}", missing.join(", "))]
    IncompleteKey { type_name: Name, missing: Vec<Name> },

    #[error("'{name}' is not a key property of '{type_name}'")]
    UnexpectedKeyProperty { type_name: Name, name: Name },

    #[error("a key predicate is not allowed after '{segment}'")]
    KeyNotAllowed { segment: Name },

    #[error("'{segment}' is a collection; address a single entity before '{next}'")]
    KeyRequired { segment: Name, next: Name },

    #[error("'{type_name}' is not derived from '{base}'")]
    InvalidTypeCast { type_name: Name, base: Name },

    #[error("{context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: String,
        found: String,
    },

    #[error("'{method}' takes {expected} argument(s), found {found}")]
    ArityMismatch {
        method: Name,
        expected: String,
        found: usize,
    },

    #[error("lambda variable '{name}' is not in scope")]
    UnknownLambdaVariable { name: Name },

    #[error("'{name}' is not a collection")]
    NotACollection { name: Name },

    #[error("'{name}' is not a navigation property of '{type_name}'")]
    NotANavigationProperty { type_name: Name, name: Name },

    #[error("'{member}' is not a member of enum '{type_name}'")]
    UnknownEnumMember { type_name: Name, member: Name },

    #[error("no segment may follow '{segment}'")]
    SegmentAfterTerminal { segment: String },

    #[error("'{segment}' is not allowed here")]
    SegmentNotAllowed { segment: String },

    #[error("{option} is not applicable to {target}")]
    OptionNotApplicable { option: String, target: String },
}

impl ResolveError {
    pub(crate) fn mismatch(
        context: impl Into<String>,
        expected: impl Into<String>,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            context: context.into(),
            expected: expected.into(),
            found: found.to_string(),
        }
    }

    pub(crate) fn not_applicable(option: &str, target: impl ToString) -> Self {
        Self::OptionNotApplicable {
            option: option.to_string(),
            target: target.to_string(),
        }
    }
}
