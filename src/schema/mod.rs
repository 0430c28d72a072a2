//! # Schema Façade
//!
//! A symbolic reference into an externally supplied schema (spec §4.B). The
//! schema loader itself is an external collaborator; this module defines
//! only the surface the elaborator consumes: [`SchemaFacade`].
//!
//! ## Arena of type references
//!
//! Per design note §9 ("cyclic references"), named type descriptions live in
//! a flat arena (`Vec<TypeDescription>`) indexed by [`TypeId`]; a [`TypeRef`]
//! is a `TypeId` plus a cached qualified name used for nominal equality and
//! `Display`. This keeps self-referential types (a field whose type is its
//! own declaring type) representable without pointer cycles — the facade
//! resolves a `TypeRef` back to its `TypeDescription` lazily, by index.

pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use errors::SchemaError;

/// Index into a [`SchemaFacade`]'s type arena. Opaque outside this module;
/// callers compare and look up types only through [`TypeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// A symbolic reference into a schema. Equality is nominal — by qualified
/// name — never structural.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRef {
    pub id: TypeId,
    pub name: String,
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for TypeRef {}

impl std::hash::Hash for TypeRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TypeRef {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        TypeRef {
            id,
            name: name.into(),
        }
    }

    /// Denotes a term navigable by predicates: `TypeRef / "field"`.
    pub fn path(&self, field: &str) -> crate::term::FieldPath {
        crate::term::FieldPath::new(self.clone(), field)
    }
}

impl std::ops::Div<&str> for TypeRef {
    type Output = crate::term::FieldPath;

    fn div(self, field: &str) -> Self::Output {
        crate::term::FieldPath::new(self, field)
    }
}

/// A declared argument on a field (name, declared type, default if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputValue {
    pub name: String,
    pub declared_type: TypeRef,
    pub required: bool,
    pub default: Option<crate::value::Value>,
}

/// The three GraphQL operation kinds, used by [`SchemaFacade::root_operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        };
        write!(f, "{name}")
    }
}

/// The surface the elaborator consumes from an externally supplied schema
/// (spec §4.B). Implementations own how types are loaded (SDL file,
/// introspection JSON, in-memory registry); the elaborator only ever calls
/// through this trait.
pub trait SchemaFacade {
    fn lookup_type(&self, name: &str) -> Option<TypeRef>;
    fn field_type(&self, tpe: &TypeRef, field: &str) -> Option<TypeRef>;
    fn field_arguments(&self, tpe: &TypeRef, field: &str) -> Option<Vec<InputValue>>;
    fn is_leaf(&self, tpe: &TypeRef) -> bool;
    fn possible_types(&self, tpe: &TypeRef) -> Vec<TypeRef>;
    fn root_operation(&self, op: OperationKind) -> Option<TypeRef>;
}

/// Not gated behind `#[cfg(test)]`: this crate's own `tests/` integration
/// suite links against the compiled library as an external crate, where a
/// `cfg(test)` item from the library is invisible. The fixtures here are
/// still test-only by convention (never referenced by non-test code).
pub mod static_schema;
