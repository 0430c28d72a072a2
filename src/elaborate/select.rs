//! Phase 2 — per-type `Select` elaboration (spec §4.F.2). Walks the tree
//! tracking the current focus type, validates each field/argument against
//! the schema, enforces the leaf/non-leaf subselection shape, and gives a
//! per-type handler the chance to rewrite the node (e.g. wrapping a
//! single-entity lookup in `Unique(Filter(...))`).
//!
//! Per-field problems never abort traversal early (spec §7: phases 2-8
//! accumulate) — every sibling is still visited so multiple problems can be
//! reported from one compile. Whether the *final* outcome for a subtree is
//! `Warning` (compile still usable) or `Failure` (spec §8 scenario 4)
//! depends on the problem's class, decided by [`is_fatal`]: an unresolved
//! name is recoverable — the field is passed through and elaboration
//! proceeds — while a structural violation (a leaf with a subselection, a
//! non-leaf without one, a coercion failure, the recursion-depth guard)
//! means the subtree can no longer be evaluated at all.

use crate::config::ElaboratorConfig;
use crate::error::{CompileError, Phase};
use crate::query::Query;
use crate::result::{Outcome, Problem};
use crate::schema::{SchemaFacade, TypeRef};
use crate::value::{Binding, Value};
use std::collections::HashMap;

/// `(fieldName, args, fieldType, elaboratedChild) -> rewrittenNode` (spec
/// §4.F.2 "domain-specific rewriting", §9 "per-type dispatch table").
pub type SelectHandler = dyn Fn(&str, &[Binding], &TypeRef, Query) -> Outcome<Query> + Send + Sync;

/// A map from the *parent* type of a `Select` to a rewrite handler, with an
/// identity fallback when no handler is registered (spec §9).
pub struct SelectElaborator {
    handlers: HashMap<TypeRef, Box<SelectHandler>>,
}

impl SelectElaborator {
    pub fn empty() -> Self {
        SelectElaborator {
            handlers: HashMap::new(),
        }
    }

    pub fn builder() -> SelectElaboratorBuilder {
        SelectElaboratorBuilder::new()
    }

    fn handler_for(&self, parent_type: &TypeRef) -> Option<&SelectHandler> {
        self.handlers.get(parent_type).map(|b| b.as_ref())
    }
}

/// Composes multiple per-type handlers by chaining registrations (spec §9).
pub struct SelectElaboratorBuilder {
    handlers: HashMap<TypeRef, Box<SelectHandler>>,
}

impl SelectElaboratorBuilder {
    pub fn new() -> Self {
        SelectElaboratorBuilder {
            handlers: HashMap::new(),
        }
    }

    pub fn with_handler(
        mut self,
        parent_type: TypeRef,
        handler: impl Fn(&str, &[Binding], &TypeRef, Query) -> Outcome<Query> + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(parent_type, Box::new(handler));
        self
    }

    pub fn build(self) -> SelectElaborator {
        SelectElaborator {
            handlers: self.handlers,
        }
    }
}

impl Default for SelectElaboratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Problems that mean the surrounding node cannot be meaningfully evaluated
/// at all (structural violations, input coercion failures) escalate the
/// whole subtree's outcome to `Failure`, per spec §8 scenario 4
/// (`LeafSubselection` on an invalid query fails the compile outright).
/// Everything else — unresolved names — is recoverable: the field is
/// dropped or passed through and the compile proceeds with a `Warning`.
fn is_fatal(error: &CompileError) -> bool {
    matches!(
        error,
        CompileError::LeafSubselection { .. }
            | CompileError::NonLeafSubselection { .. }
            | CompileError::TypeMismatch { .. }
            | CompileError::MissingRequired { .. }
            | CompileError::InternalInvariant { .. }
    )
}

fn finish(problems: Vec<Problem>, value: Query) -> Outcome<Query> {
    if problems.iter().any(|p| is_fatal(&p.error)) {
        Outcome::Failure(problems)
    } else if problems.is_empty() {
        Outcome::Success(value)
    } else {
        Outcome::Warning(problems, value)
    }
}

fn coerce_and_validate_args(
    field_name: &str,
    args: Vec<Binding>,
    declared: &[crate::schema::InputValue],
    problems: &mut Vec<Problem>,
) -> Vec<Binding> {
    let mut coerced = Vec::new();
    for binding in args {
        match declared.iter().find(|d| d.name == binding.name) {
None => {
                log::warn!("unknown argument '{}' on field '{}'", binding.name, field_name);
                problems.push(Problem::at_phase(
                    CompileError::unknown_argument(field_name, binding.name.clone()),
                    Phase::SelectElaboration,
                ));
            }
            Some(_) => {
                let value = match binding.value {
                    Value::UntypedEnumValue(name) => Value::Enum(name),
                    other => other,
                };
                coerced.push(Binding::new(binding.name, value));
            }
        }
    }
    for decl in declared {
        if coerced.iter().any(|b| b.name == decl.name) {
            continue;
        }
        match &decl.default {
            Some(default) => coerced.push(Binding::new(decl.name.clone(), default.clone())),
            None if decl.required => problems.push(Problem::at_phase(
                CompileError::MissingRequired {
                    arg_name: decl.name.clone(),
                },
                Phase::SelectElaboration,
            )),
            None => {}
        }
    }
    coerced
}

/// Entry point for phase 2 (spec §4.F.2). `parent_type` starts at the
/// operation's root type.
pub fn elaborate_select(
    q: Query,
    parent_type: TypeRef,
    schema: &dyn SchemaFacade,
    elaborator: &SelectElaborator,
    config: &ElaboratorConfig,
    depth: usize,
) -> Outcome<Query> {
    if depth > config.max_recursion_depth {
        return Outcome::failure_one(CompileError::internal("max recursion depth exceeded"));
    }

    match q {
        Query::Select { name, args, child } => {
            let Some(field_type) = schema.field_type(&parent_type, &name) else {
                log::warn!("unknown field '{}' on type '{}'", name, parent_type.name);
                let problem = Problem::at_phase(
                    CompileError::unknown_field(parent_type.name.clone(), name.clone()),
                    Phase::SelectElaboration,
                );
                return Outcome::Warning(vec![problem], Query::select(name, args, *child));
            };

            let mut problems = Vec::new();
            let declared = schema.field_arguments(&parent_type, &name).unwrap_or_default();
            let coerced_args = coerce_and_validate_args(&name, args, &declared, &mut problems);

            let is_leaf = schema.is_leaf(&field_type);
            let child_is_empty = child.is_empty_node();
            if is_leaf && !child_is_empty {
                problems.push(Problem::at_phase(
                    CompileError::LeafSubselection {
                        field: name.clone(),
                        tpe: field_type.name.clone(),
                    },
                    Phase::SelectElaboration,
                ));
            }
            if !is_leaf && child_is_empty {
                problems.push(Problem::at_phase(
                    CompileError::NonLeafSubselection {
                        field: name.clone(),
                        tpe: parent_type.name.clone(),
                    },
                    Phase::SelectElaboration,
                ));
            }

            let elaborated_child = if is_leaf {
                Query::Empty
            } else {
                match elaborate_select(*child, field_type.clone(), schema, elaborator, config, depth + 1) {
                    Outcome::Success(c) => c,
                    Outcome::Warning(p, c) => {
                        problems.extend(p);
                        c
                    }
                    Outcome::Failure(p) => {
                        problems.extend(p);
                        Query::Empty
                    }
                }
            };

            let rewritten = match elaborator.handler_for(&parent_type) {
                Some(handler) => {
                    log::debug!("per-type handler rewriting field '{}' on '{}'", name, parent_type.name);
                    match handler(&name, &coerced_args, &field_type, elaborated_child) {
                        Outcome::Success(q2) => q2,
                        Outcome::Warning(p, q2) => {
                            problems.extend(p);
                            q2
                        }
                        Outcome::Failure(p) => {
                            problems.extend(p);
                            Query::select(name, coerced_args, Query::Empty)
                        }
                    }
                }
                None => Query::select(name, coerced_args, elaborated_child),
            };

            finish(problems, rewritten)
        }
        Query::Group(items) => {
            let mut problems = Vec::new();
            let mut results = Vec::with_capacity(items.len());
            for item in items {
                match elaborate_select(item, parent_type.clone(), schema, elaborator, config, depth) {
                    Outcome::Success(c) => results.push(c),
                    Outcome::Warning(p, c) => {
                        problems.extend(p);
                        results.push(c);
                    }
                    Outcome::Failure(p) => problems.extend(p),
                }
            }
            finish(problems, Query::Group(results))
        }
        Query::UntypedNarrow { type_name, child } => match schema.lookup_type(&type_name) {
            Some(narrowed_type) => {
                elaborate_select(*child, narrowed_type, schema, elaborator, config, depth + 1)
                    .map(|c| Query::UntypedNarrow {
                        type_name,
                        child: Box::new(c),
                    })
            }
            None => {
                let problem = Problem::at_phase(CompileError::unknown_type(type_name.clone()), Phase::SelectElaboration);
                Outcome::Warning(
                    vec![problem],
                    Query::UntypedNarrow {
                        type_name,
                        child,
                    },
                )
            }
        },
        Query::Rename { name, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::rename(name, c))
        }
        Query::Wrap { name, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::wrap(name, c))
        }
        Query::Skip { sense, cond, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::Skip {
                sense,
                cond,
                child: Box::new(c),
            })
        }
        Query::Narrow { subtype, child } => {
            elaborate_select(*child, subtype.clone(), schema, elaborator, config, depth + 1)
                .map(|c| Query::narrow(subtype, c))
        }
        Query::Unique(c) => elaborate_select(*c, parent_type, schema, elaborator, config, depth).map(Query::unique),
        Query::Filter(pred, c) => {
            elaborate_select(*c, parent_type, schema, elaborator, config, depth).map(|c| Query::filter(pred, c))
        }
        Query::Component { mapping, join, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::Component {
                mapping,
                join,
                child: Box::new(c),
            })
        }
        Query::Effect { handler, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::Effect {
                handler,
                child: Box::new(c),
            })
        }
        Query::Introspect { schema: schema_name, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::Introspect {
                schema: schema_name,
                child: Box::new(c),
            })
        }
        Query::Environment { env, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::Environment {
                env,
                child: Box::new(c),
            })
        }
        Query::Limit { n, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::limit(n, c))
        }
        Query::Offset { n, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::offset(n, c))
        }
        Query::OrderBy { selections, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth)
                .map(|c| Query::order_by(selections, c))
        }
        Query::Count { name, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::count(name, c))
        }
        Query::TransformCursor { transform, child } => {
            elaborate_select(*child, parent_type, schema, elaborator, config, depth).map(|c| Query::TransformCursor {
                transform,
                child: Box::new(c),
            })
        }
        Query::Skipped => Outcome::Success(Query::Skipped),
        Query::Empty => Outcome::Success(Query::Empty),
    }
}
