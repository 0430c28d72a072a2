//! Phase 8 — validation (spec §4.F.8). Walks the fully elaborated tree one
//! last time checking the structural invariants from spec §3: `Group` has
//! at least two members and never nests a bare `Group` directly inside
//! another, `Binding` lists carry no duplicate names, and no `Untyped*`
//! variant (either `Query::UntypedNarrow` or a `Value::Untyped*`) remains
//! reachable anywhere in the tree (spec P5). Accumulates problems like every
//! other late-pipeline phase; this pass never rewrites the tree, only
//! reports.

use crate::error::{CompileError, Phase};
use crate::query::Query;
use crate::result::{Outcome, Problem};
use crate::value::has_duplicate_names;

fn check(q: &Query, problems: &mut Vec<Problem>) {
    match q {
        Query::Select { name, args, child } => {
            if has_duplicate_names(args) {
                log::warn!("duplicate argument names on field '{name}'");
                problems.push(Problem::at_phase(
                    CompileError::internal(format!("duplicate argument names on field '{name}'")),
                    Phase::Validation,
                ));
            }
            for arg in args {
                if arg.value.contains_untyped() {
                    log::warn!("untyped value reachable from argument '{}' on field '{name}'", arg.name);
                    problems.push(Problem::at_phase(
                        CompileError::internal(format!(
                            "untyped value reachable from argument '{}' on field '{name}'",
                            arg.name
                        )),
                        Phase::Validation,
                    ));
                }
            }
            check(child, problems);
        }
        Query::Group(items) => {
            if items.len() < 2 {
                log::warn!("Group must have at least two members");
                problems.push(Problem::at_phase(
                    CompileError::internal("Group must have at least two members"),
                    Phase::Validation,
                ));
            }
            for item in items {
                if matches!(item, Query::Group(_)) {
                    log::warn!("Group must not directly nest another Group");
                    problems.push(Problem::at_phase(
                        CompileError::internal("Group must not directly nest another Group"),
                        Phase::Validation,
                    ));
                }
                if matches!(item, Query::Empty) {
                    log::warn!("Group must not retain an Empty member after merge");
                    problems.push(Problem::at_phase(
                        CompileError::internal("Group must not retain an Empty member after merge"),
                        Phase::Validation,
                    ));
                }
                check(item, problems);
            }
        }
        Query::UntypedNarrow { type_name, child } => {
            log::warn!("UntypedNarrow('{type_name}') survived elaboration");
            problems.push(Problem::at_phase(
                CompileError::internal(format!("UntypedNarrow('{type_name}') survived elaboration")),
                Phase::Validation,
            ));
            check(child, problems);
        }
        Query::Unique(c) | Query::Count { child: c, .. } => check(c, problems),
        Query::Filter(_, c) => check(c, problems),
        Query::Component { child, .. }
        | Query::Effect { child, .. }
        | Query::Introspect { child, .. }
        | Query::Environment { child, .. }
        | Query::Wrap { child, .. }
        | Query::Rename { child, .. }
        | Query::Narrow { child, .. }
        | Query::Skip { child, .. }
        | Query::Limit { child, .. }
        | Query::Offset { child, .. }
        | Query::OrderBy { child, .. }
        | Query::TransformCursor { child, .. } => check(child, problems),
        Query::Skipped | Query::Empty => {}
    }
}

/// Entry point for phase 8. Never rewrites; returns `selection` unchanged in
/// `Success`/`Warning`.
pub fn validate(selection: Query) -> Outcome<Query> {
    let mut problems = Vec::new();
    check(&selection, &mut problems);
    if problems.is_empty() {
        Outcome::Success(selection)
    } else {
        Outcome::Warning(problems, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Binding, Value};

    #[test]
    fn clean_tree_passes_without_problems() {
        let tree = Query::Group(vec![Query::leaf("a", vec![]), Query::leaf("b", vec![])]);
        let result = validate(tree);
        assert!(!result.is_failure());
        assert!(result.problems().is_empty());
    }

    #[test]
    fn flags_singleton_group() {
        let tree = Query::Group(vec![Query::leaf("a", vec![])]);
        let result = validate(tree);
        assert_eq!(result.problems().len(), 1);
    }

    #[test]
    fn flags_nested_group() {
        let tree = Query::Group(vec![
            Query::leaf("a", vec![]),
            Query::Group(vec![Query::leaf("b", vec![]), Query::leaf("c", vec![])]),
        ]);
        let result = validate(tree);
        assert!(result.problems().iter().any(|p| format!("{p}").contains("nest")));
    }

    #[test]
    fn flags_leftover_untyped_narrow() {
        let tree = Query::UntypedNarrow {
            type_name: "Droid".to_string(),
            child: Box::new(Query::leaf("name", vec![])),
        };
        let result = validate(tree);
        assert_eq!(result.problems().len(), 1);
    }

    #[test]
    fn flags_untyped_value_in_argument() {
        let tree = Query::leaf(
            "character",
            vec![Binding::new("id", Value::UntypedVariableValue("id".into()))],
        );
        let result = validate(tree);
        assert!(!result.problems().is_empty());
    }

    #[test]
    fn flags_duplicate_argument_names() {
        let tree = Query::leaf(
            "character",
            vec![
                Binding::new("id", Value::Int(1)),
                Binding::new("id", Value::Int(2)),
            ],
        );
        let result = validate(tree);
        assert!(!result.problems().is_empty());
    }
}
