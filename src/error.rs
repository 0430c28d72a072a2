//! # Compile Error Types
//!
//! The error taxonomy produced by the elaborator pipeline (spec §7). Every
//! variant here is a named failure kind from schema/name resolution, input
//! coercion, or structural validation; phase 1 (variable binding) and phase 6
//! (component boundary elaboration) short-circuit on these, while the rest
//! accumulate them into a [`crate::result::Outcome`].
//!
//! ## Usage Patterns
//!
//! ```ignore
//! CompileError::unknown_field("Character", "nam")
//! ```

use thiserror::Error;

/// One of the eight elaborator phases (spec §4.F), used to attribute a
/// [`crate::result::Problem`] to the pass that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    VariableBinding,
    SelectElaboration,
    IntrospectionHoisting,
    TypeRefinementNormalization,
    SkipIncludeFolding,
    ComponentBoundaryElaboration,
    Merge,
    Validation,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::VariableBinding => "VariableBinding",
            Phase::SelectElaboration => "SelectElaboration",
            Phase::IntrospectionHoisting => "IntrospectionHoisting",
            Phase::TypeRefinementNormalization => "TypeRefinementNormalization",
            Phase::SkipIncludeFolding => "SkipIncludeFolding",
            Phase::ComponentBoundaryElaboration => "ComponentBoundaryElaboration",
            Phase::Merge => "Merge",
            Phase::Validation => "Validation",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CompileError {
    #[error("Parse error at line {line} column {col}\n{snippet}\n{caret}")]
    Parse {
        line: usize,
        col: usize,
        snippet: String,
        caret: String,
    },

    #[error("Unknown field '{name}' on type '{parent_type}'")]
    UnknownField { parent_type: String, name: String },

    #[error("Unknown argument '{arg_name}' on field '{field}'")]
    UnknownArgument { field: String, arg_name: String },

    #[error("Unknown type '{name}'")]
    UnknownType { name: String },

    #[error("Unknown variable '${name}'")]
    UnknownVariable { name: String },

    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Missing required argument '{arg_name}'")]
    MissingRequired { arg_name: String },

    #[error("Field '{field}' of leaf type '{tpe}' may not have a subselection")]
    LeafSubselection { field: String, tpe: String },

    #[error("Field '{field}' of non-leaf type '{tpe}' requires a subselection")]
    NonLeafSubselection { field: String, tpe: String },

    #[error("Ambiguous merge: selections on '{field}' with alias '{alias}' disagree on arguments")]
    AmbiguousMerge { field: String, alias: String },

    #[error("Internal invariant violated: {detail}")]
    InternalInvariant { detail: String },

    #[error("At least one operation required")]
    NoOperations,
}

impl CompileError {
    pub fn unknown_field(parent_type: impl Into<String>, name: impl Into<String>) -> Self {
        CompileError::UnknownField {
            parent_type: parent_type.into(),
            name: name.into(),
        }
    }

    pub fn unknown_argument(field: impl Into<String>, arg_name: impl Into<String>) -> Self {
        CompileError::UnknownArgument {
            field: field.into(),
            arg_name: arg_name.into(),
        }
    }

    pub fn unknown_type(name: impl Into<String>) -> Self {
        CompileError::UnknownType { name: name.into() }
    }

    pub fn unknown_variable(name: impl Into<String>) -> Self {
        CompileError::UnknownVariable { name: name.into() }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        CompileError::InternalInvariant {
            detail: detail.into(),
        }
    }
}
