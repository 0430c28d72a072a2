//! # Elaborator Pipeline
//!
//! The eight-phase rewrite from an [`crate::effect::UntypedOperation`] to a
//! fully typed [`crate::effect::Operation`] (spec §4.F):
//!
//! 1. variable binding (short-circuits)
//! 2. per-type `Select` elaboration (accumulates)
//! 3. introspection hoisting (accumulates — never fails)
//! 4. type-refinement normalization (accumulates)
//! 5. skip/include folding (accumulates — never fails)
//! 6. component boundary elaboration (short-circuits)
//! 7. merge (accumulates)
//! 8. validation (accumulates)
//!
//! [`Elaborator`] bundles the schema and the two per-type dispatch tables
//! (phases 2 and 6 are the only phases with external extension points) plus
//! the run's [`ElaboratorConfig`], mirroring the teacher's practice of a
//! single facade type owning the collaborators a multi-pass pipeline needs.

mod component;
mod introspection;
mod narrow;
mod select;
mod skip_include;
mod validate;
mod variables;

pub use component::{ComponentElaborator, ComponentElaboratorBuilder};
pub use select::{SelectElaborator, SelectElaboratorBuilder, SelectHandler};

use crate::config::ElaboratorConfig;
use crate::effect::{Operation, UntypedOperation};
use crate::error::CompileError;
use crate::parser::TextParser;
use crate::rewrite::merge_queries;
use crate::result::Outcome;
use crate::schema::SchemaFacade;
use crate::value::Value;
use std::collections::HashMap;

/// Bundles the schema and the pipeline's two pluggable dispatch tables.
pub struct Elaborator<'a> {
    pub schema: &'a dyn SchemaFacade,
    pub select: SelectElaborator,
    pub component: ComponentElaborator,
    pub config: ElaboratorConfig,
}

impl<'a> Elaborator<'a> {
    pub fn new(schema: &'a dyn SchemaFacade) -> Self {
        Elaborator {
            schema,
            select: SelectElaborator::empty(),
            component: ComponentElaborator::empty(),
            config: ElaboratorConfig::default(),
        }
    }

    pub fn with_select(mut self, select: SelectElaborator) -> Self {
        self.select = select;
        self
    }

    pub fn with_component(mut self, component: ComponentElaborator) -> Self {
        self.component = component;
        self
    }

    pub fn with_config(mut self, config: ElaboratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the full eight-phase pipeline against one operation.
    pub fn compile(
        &self,
        op: UntypedOperation,
        variables: &HashMap<String, Value>,
    ) -> Outcome<Operation> {
        compile_operation(op, self.schema, variables, &self.select, &self.component, &self.config)
    }
}

/// Runs the eight-phase pipeline (spec §4.F) against a single untyped
/// operation, threading accumulated problems through to the final
/// [`Outcome`].
pub fn compile_operation(
    op: UntypedOperation,
    schema: &dyn SchemaFacade,
    variables: &HashMap<String, Value>,
    select_elaborator: &SelectElaborator,
    component_elaborator: &ComponentElaborator,
    config: &ElaboratorConfig,
) -> Outcome<Operation> {
    let kind: crate::schema::OperationKind = op.kind.into();
    let Some(root_type) = schema.root_operation(kind) else {
        return Outcome::failure_one(CompileError::unknown_type(format!("{kind} root")));
    };

    // Phase 1 — variable binding. Short-circuits: nothing downstream can be
    // trusted if a variable reference didn't resolve.
    variables::bind_variables(op.selection, &op.variables, variables)
        // Phase 2 — per-type Select elaboration. Accumulates.
        .and_then(|selection| {
            select::elaborate_select(selection, root_type.clone(), schema, select_elaborator, config, 0)
        })
        // Phase 3 — introspection hoisting. Never fails.
        .map(|selection| introspection::hoist_introspection(selection, &root_type.name, config))
        // Phase 4 — type-refinement normalization. Accumulates.
        .and_then(|selection| narrow::normalize_narrows(selection, schema))
        // Phase 5 — skip/include folding. Never fails.
        .map(skip_include::fold_skip_include)
        // Phase 6 — component boundary elaboration. Short-circuits.
        .and_then(|selection| {
            component::elaborate_components(selection, root_type.clone(), schema, component_elaborator)
        })
        // Phase 7 — merge. Accumulates.
        .and_then(|selection| merge_queries(std::slice::from_ref(&selection)))
        // Phase 8 — validation. Accumulates.
        .and_then(validate::validate)
        .map(|plan| Operation {
            kind,
            name: op.name,
            root_type,
            plan,
        })
}

/// Parses `text` with `parser` and compiles every resulting operation,
/// failing immediately if there are none (spec §6's `compile_text`).
pub fn compile_text(
    text: &str,
    parser: &dyn TextParser,
    schema: &dyn SchemaFacade,
    variables: &HashMap<String, Value>,
    select_elaborator: &SelectElaborator,
    component_elaborator: &ComponentElaborator,
    config: &ElaboratorConfig,
) -> Outcome<Vec<Operation>> {
    parser.parse(text).and_then(|ops| {
        if ops.is_empty() {
            return Outcome::failure_one(CompileError::NoOperations);
        }
        Outcome::<()>::traverse(ops, |op| {
            compile_operation(op, schema, variables, select_elaborator, component_elaborator, config)
        })
    })
}
