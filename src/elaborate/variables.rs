//! Phase 1 — variable binding (spec §4.F.1). Resolves every
//! `Value::UntypedVariableValue` in the untyped tree against the operation's
//! variable definitions and caller-supplied values, coercing defaults and
//! failing `MissingRequired`/`UnknownVariable` where the source cannot be
//! resolved. Short-circuits the pipeline on failure (spec §7): nothing
//! downstream can be trusted if a variable reference didn't resolve.

use crate::effect::UntypedVarDef;
use crate::error::CompileError;
use crate::query::Query;
use crate::result::Outcome;
use crate::value::{Binding, Value};
use std::collections::HashMap;

fn resolve_value(
    value: Value,
    var_defs: &[UntypedVarDef],
    variables: &HashMap<String, Value>,
) -> Outcome<Value> {
    match value {
        Value::UntypedVariableValue(name) => match var_defs.iter().find(|d| d.name == name) {
            None => {
                log::warn!("reference to undeclared variable '${name}'");
                Outcome::failure_one(CompileError::unknown_variable(name))
            }
            Some(def) => {
                if let Some(v) = variables.get(&name) {
                    Outcome::Success(v.clone())
                } else if let Some(default) = &def.default {
                    Outcome::Success(default.clone())
                } else if def.required {
                    log::warn!("required variable '${name}' supplied no value and has no default");
                    Outcome::failure_one(CompileError::MissingRequired { arg_name: name })
                } else {
                    Outcome::Success(Value::Null)
                }
            }
        },
        Value::List(items) => {
            Outcome::<()>::traverse(items, |v| resolve_value(v, var_defs, variables)).map(Value::List)
        }
        Value::Object(fields) => Outcome::<()>::traverse(fields, |(k, v)| {
            resolve_value(v, var_defs, variables).map(|v2| (k, v2))
        })
        .map(Value::Object),
        other => Outcome::Success(other),
    }
}

fn resolve_binding(
    binding: Binding,
    var_defs: &[UntypedVarDef],
    variables: &HashMap<String, Value>,
) -> Outcome<Binding> {
    resolve_value(binding.value, var_defs, variables).map(|v| Binding::new(binding.name, v))
}

fn bind_query(
    q: Query,
    var_defs: &[UntypedVarDef],
    variables: &HashMap<String, Value>,
) -> Outcome<Query> {
    match q {
        Query::Select { name, args, child } => {
            let args_outcome = Outcome::<()>::traverse(args, |b| resolve_binding(b, var_defs, variables));
            let child_outcome = bind_query(*child, var_defs, variables);
            args_outcome.combine2(child_outcome, |args, child| Query::select(name, args, child))
        }
        Query::Group(items) => {
            Outcome::<()>::traverse(items, |c| bind_query(c, var_defs, variables)).map(Query::Group)
        }
        Query::Unique(c) => bind_query(*c, var_defs, variables).map(Query::unique),
        Query::Filter(pred, c) => bind_query(*c, var_defs, variables).map(|c| Query::filter(pred, c)),
        Query::Component { mapping, join, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::Component {
                mapping,
                join,
                child: Box::new(c),
            })
        }
        Query::Effect { handler, child } => bind_query(*child, var_defs, variables).map(|c| Query::Effect {
            handler,
            child: Box::new(c),
        }),
        Query::Introspect { schema, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::Introspect {
                schema,
                child: Box::new(c),
            })
        }
        Query::Environment { env, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::Environment {
                env,
                child: Box::new(c),
            })
        }
        Query::Wrap { name, child } => bind_query(*child, var_defs, variables).map(|c| Query::wrap(name, c)),
        Query::Rename { name, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::rename(name, c))
        }
        Query::UntypedNarrow { type_name, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::UntypedNarrow {
                type_name,
                child: Box::new(c),
            })
        }
        Query::Narrow { subtype, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::narrow(subtype, c))
        }
        Query::Skip { sense, cond, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::Skip {
                sense,
                cond,
                child: Box::new(c),
            })
        }
        Query::Limit { n, child } => bind_query(*child, var_defs, variables).map(|c| Query::limit(n, c)),
        Query::Offset { n, child } => bind_query(*child, var_defs, variables).map(|c| Query::offset(n, c)),
        Query::OrderBy { selections, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::order_by(selections, c))
        }
        Query::Count { name, child } => bind_query(*child, var_defs, variables).map(|c| Query::count(name, c)),
        Query::TransformCursor { transform, child } => {
            bind_query(*child, var_defs, variables).map(|c| Query::TransformCursor {
                transform,
                child: Box::new(c),
            })
        }
        Query::Skipped => Outcome::Success(Query::Skipped),
        Query::Empty => Outcome::Success(Query::Empty),
    }
}

/// Entry point for phase 1 (spec §4.F.1).
pub fn bind_variables(
    selection: Query,
    var_defs: &[UntypedVarDef],
    variables: &HashMap<String, Value>,
) -> Outcome<Query> {
    bind_query(selection, var_defs, variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var_def(name: &str, required: bool, default: Option<Value>) -> UntypedVarDef {
        UntypedVarDef::new(name, "String", required, default)
    }

    #[test]
    fn substitutes_supplied_variable_value() {
        let tree = Query::leaf("character", vec![Binding::new("id", Value::UntypedVariableValue("id".into()))]);
        let mut variables = HashMap::new();
        variables.insert("id".to_string(), Value::String("1000".into()));
        let result = bind_variables(tree, &[var_def("id", true, None)], &variables);
        match result.value().unwrap() {
            Query::Select { args, .. } => assert_eq!(args[0].value, Value::String("1000".into())),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn applies_default_when_not_supplied() {
        let tree = Query::leaf("character", vec![Binding::new("id", Value::UntypedVariableValue("id".into()))]);
        let result = bind_variables(tree, &[var_def("id", false, Some(Value::String("default".into())))], &HashMap::new());
        match result.value().unwrap() {
            Query::Select { args, .. } => assert_eq!(args[0].value, Value::String("default".into())),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn undeclared_variable_fails() {
        let tree = Query::leaf("character", vec![Binding::new("id", Value::UntypedVariableValue("missing".into()))]);
        let result = bind_variables(tree, &[], &HashMap::new());
        assert!(result.is_failure());
    }

    #[test]
    fn required_without_value_or_default_fails() {
        let tree = Query::leaf("character", vec![Binding::new("id", Value::UntypedVariableValue("id".into()))]);
        let result = bind_variables(tree, &[var_def("id", true, None)], &HashMap::new());
        assert!(result.is_failure());
    }
}
