//! # Effects & Operation Shapes
//!
//! [`UntypedOperation`] is what an external parser produces (spec §6.1): a
//! single GraphQL operation whose selection is a [`Query`] tree still
//! carrying `Untyped*` value variants and `UntypedNarrow` nodes, plus
//! variable declarations as raw, unresolved type names. [`Operation`] is
//! what [`crate::elaborate::compile_operation`] produces from it.
//!
//! [`EffectHandler`] is the seam between a queued `Effect` plan node and
//! whatever concurrency runtime actually executes it — the core has no
//! suspension points of its own (spec §5: "do not couple the compiler to
//! any specific runtime"). Per spec §9 ("effect polymorphism"), resolution
//! is batched rather than one-at-a-time: the handler receives every query
//! queued under a cursor in one call and owns scheduling, batching, and
//! cancellation for that batch — this trait is generic over an opaque
//! [`Cursor`] and async via `async-trait` rather than tied to any
//! particular executor.

use crate::error::CompileError;
use crate::query::Query;
use crate::schema::OperationKind;
use crate::value::Value;
use async_trait::async_trait;

/// An external row/record handle a plan is evaluated against. Defined here
/// only as a marker — its shape is entirely owned by the runtime
/// interpreter that walks a compiled [`Query`]. `Clone` so a batch of
/// queued queries can each be paired with the cursor their own
/// continuation resumes against.
pub trait Cursor: Clone {}

/// A variable declaration as written in operation text: the declared type
/// is still a raw name, not yet resolved to a [`crate::schema::TypeRef`]
/// (spec phase 1, variable binding).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UntypedVarDef {
    pub name: String,
    pub declared_type_name: String,
    pub required: bool,
    pub default: Option<Value>,
}

impl UntypedVarDef {
    pub fn new(
        name: impl Into<String>,
        declared_type_name: impl Into<String>,
        required: bool,
        default: Option<Value>,
    ) -> Self {
        UntypedVarDef {
            name: name.into(),
            declared_type_name: declared_type_name.into(),
            required,
            default,
        }
    }
}

/// A single operation as produced by an external text parser (spec §6.1):
/// unelaborated, with raw variable type names and a `Query` tree that may
/// still contain `Untyped*` value variants and `UntypedNarrow` nodes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UntypedOperation {
    pub kind: UntypedOperationKind,
    pub name: Option<String>,
    pub variables: Vec<UntypedVarDef>,
    pub selection: Query,
}

/// Mirrors [`OperationKind`] at the parser boundary. Kept distinct because
/// parse-time operation kind is a syntactic fact (the `query`/`mutation`/
/// `subscription` keyword) independent of whether the schema actually
/// declares that root — phase 1 is what cross-checks the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UntypedOperationKind {
    Query,
    Mutation,
    Subscription,
}

impl From<UntypedOperationKind> for OperationKind {
    fn from(kind: UntypedOperationKind) -> Self {
        match kind {
            UntypedOperationKind::Query => OperationKind::Query,
            UntypedOperationKind::Mutation => OperationKind::Mutation,
            UntypedOperationKind::Subscription => OperationKind::Subscription,
        }
    }
}

/// A fully elaborated operation: the compiled [`Query`] plan plus the root
/// type it is rooted at (spec §4.F, phase 8 output).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub root_type: crate::schema::TypeRef,
    pub plan: Query,
}

/// Resolves a batch of queued `Effect` plan node continuations against a
/// runtime [`Cursor`] (spec §5/§9: "the only point where the core yields...
/// the handler owns scheduling, batching, and cancellation"). The core
/// never awaits one effect at a time — it hands the handler every `Query`
/// queued under `cursor` in one call, and the handler decides how to batch,
/// schedule, or cancel the underlying work. Each returned pair threads the
/// originating query through to the cursor its continuation should resume
/// against; implementations own the actual concurrency context entirely,
/// the core never calls an executor directly.
#[async_trait]
pub trait EffectHandler<C: Cursor + Send + Sync>: Send + Sync {
    async fn run_effects(
        &self,
        queries: Vec<Query>,
        cursor: &C,
    ) -> Result<Vec<(Query, C)>, CompileError>;
}
