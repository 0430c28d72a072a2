//! gql-algebra - query algebra and elaborator for a GraphQL query engine
//!
//! This crate provides the core of a GraphQL query compiler:
//! - A recursive algebra of plan nodes (`query`)
//! - Plan-tree rewriting utilities (`rewrite`): merging, regrouping, extraction
//! - A multi-phase, schema-directed elaborator (`elaborate`)
//! - A schema facade and value/term/predicate model (`schema`, `value`, `term`)
//! - An accumulating result carrier and an effect-polymorphic handler trait (`result`, `effect`)
//!
//! The textual GraphQL parser, the schema loader, backend interpreters, the
//! runtime cursor-walking interpreter, and CLI plumbing are external
//! collaborators; this crate only defines the interfaces it consumes from
//! them.

/// Debug print macro that only compiles in debug builds.
/// In release builds, this expands to nothing, so there's zero runtime cost.
#[macro_export]
macro_rules! debug_print {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        eprintln!($($arg)*);
    };
}

/// Debug print macro for println-style output (only in debug builds)
#[macro_export]
macro_rules! debug_println {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        println!($($arg)*);
    };
}

/// Initializes the `log` facade with `env_logger`, following the dev/test
/// convention the rest of the ambient stack uses: a cheap, idempotent call
/// safe to make from every test's setup. Failures (already initialized by
/// another test in the same binary) are silently ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}

pub mod config;
pub mod effect;
pub mod elaborate;
pub mod error;
pub mod mapping;
pub mod parser;
pub mod query;
pub mod result;
pub mod rewrite;
pub mod schema;
pub mod term;
pub mod value;

pub use effect::{Cursor, EffectHandler, Operation, UntypedOperation, UntypedVarDef};
pub use elaborate::{compile_operation, compile_text, ComponentElaborator, Elaborator, SelectElaborator};
pub use error::{CompileError, Phase};
pub use mapping::{FieldMapping, ObjectMapping};
pub use parser::TextParser;
pub use query::Query;
pub use result::{Outcome, Problem};
pub use schema::{OperationKind, SchemaFacade, TypeRef};
pub use value::{Binding, Value};
