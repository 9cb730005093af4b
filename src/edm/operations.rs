//! Actions and functions.

use crate::base::Name;

use super::types::{TypeRef, qualify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Action,
    Function,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Function => "function",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Name,
    pub ty: TypeRef,
    pub nullable: bool,
}

/// An action or function overload.
///
/// For bound operations the first parameter is the binding parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OperationKind,
    pub namespace: Name,
    pub name: Name,
    pub is_bound: bool,
    pub is_composable: bool,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeRef>,
}

impl Operation {
    fn new(kind: OperationKind, name: impl Into<Name>) -> Self {
        Self {
            kind,
            namespace: Name::default(),
            name: name.into(),
            is_bound: false,
            is_composable: false,
            parameters: Vec::new(),
            return_type: None,
        }
    }

    pub fn action(name: impl Into<Name>) -> Self {
        Self::new(OperationKind::Action, name)
    }

    pub fn function(name: impl Into<Name>) -> Self {
        Self::new(OperationKind::Function, name)
    }

    /// Mark the operation as bound to `binding_type` (added as the first parameter).
    pub fn bound_to(mut self, parameter: impl Into<Name>, binding_type: impl Into<TypeRef>) -> Self {
        self.is_bound = true;
        self.parameters.insert(
            0,
            Parameter {
                name: parameter.into(),
                ty: binding_type.into(),
                nullable: false,
            },
        );
        self
    }

    pub fn parameter(mut self, name: impl Into<Name>, ty: impl Into<TypeRef>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty: ty.into(),
            nullable: false,
        });
        self
    }

    /// Add a parameter that may be omitted from a call.
    pub fn optional_parameter(mut self, name: impl Into<Name>, ty: impl Into<TypeRef>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty: ty.into(),
            nullable: true,
        });
        self
    }

    pub fn returns(mut self, ty: impl Into<TypeRef>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn composable(mut self) -> Self {
        self.is_composable = true;
        self
    }

    pub fn qualified_name(&self) -> Name {
        qualify(&self.namespace, &self.name)
    }

    pub fn binding_parameter(&self) -> Option<&Parameter> {
        if self.is_bound {
            self.parameters.first()
        } else {
            None
        }
    }

    /// Parameters supplied by the caller, i.e. without the binding parameter.
    pub fn call_parameters(&self) -> &[Parameter] {
        if self.is_bound {
            self.parameters.get(1..).unwrap_or_default()
        } else {
            &self.parameters
        }
    }
}
