//! # Schema Facade Error Types
//!
//! Resolution failures raised while consulting a [`super::SchemaFacade`]
//! during elaboration: unknown types, unknown fields, unknown arguments.
//! These are folded into [`crate::error::CompileError`] at the elaborator
//! boundary; this module's type exists so facade implementations (the
//! schema loader is an external collaborator, spec §1) have a stable error
//! shape to report against.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("No type named '{name}' in schema")]
    UnknownType { name: String },
    #[error("Type '{tpe}' has no field named '{field}'")]
    UnknownField { tpe: String, field: String },
    #[error("No root operation type for '{operation}'")]
    MissingRootOperation { operation: String },
}
