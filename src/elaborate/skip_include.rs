//! Phase 5 — `@skip`/`@include` folding (spec §4.F.5). A `Skip(sense, cond,
//! child)` whose condition is already a `SkipCondition::Constant` is folded
//! away: `true` (suppress) collapses to `Skipped`, `false` collapses to
//! `child` itself. A `SkipCondition::Variable` node is left in place —
//! phase 1 runs before this phase and only resolves argument values inside
//! `Select` nodes, never the directive condition itself, so a
//! variable-guarded directive can still appear here if the parser chose not
//! to pre-resolve it. Either way this pass never fails; it only ever
//! simplifies.

use crate::query::Query;
use crate::query::SkipCondition;

fn fold(q: Query) -> Query {
    match q {
        Query::Skip { sense, cond, child } => {
            let child = fold(*child);
            match cond {
                SkipCondition::Constant(value) => {
                    let suppress = value == sense;
                    if suppress {
                        Query::Skipped
                    } else {
                        child
                    }
                }
                SkipCondition::Variable(name) => Query::Skip {
                    sense,
                    cond: SkipCondition::Variable(name),
                    child: Box::new(child),
                },
            }
        }
        Query::Select { name, args, child } => Query::select(name, args, fold(*child)),
        Query::Group(items) => Query::Group(items.into_iter().map(fold).collect()),
        Query::Unique(c) => Query::unique(fold(*c)),
        Query::Filter(pred, c) => Query::filter(pred, fold(*c)),
        Query::Component { mapping, join, child } => Query::Component {
            mapping,
            join,
            child: Box::new(fold(*child)),
        },
        Query::Effect { handler, child } => Query::Effect {
            handler,
            child: Box::new(fold(*child)),
        },
        Query::Introspect { schema, child } => Query::Introspect {
            schema,
            child: Box::new(fold(*child)),
        },
        Query::Environment { env, child } => Query::Environment {
            env,
            child: Box::new(fold(*child)),
        },
        Query::Wrap { name, child } => Query::wrap(name, fold(*child)),
        Query::Rename { name, child } => Query::rename(name, fold(*child)),
        Query::UntypedNarrow { type_name, child } => Query::UntypedNarrow {
            type_name,
            child: Box::new(fold(*child)),
        },
        Query::Narrow { subtype, child } => Query::narrow(subtype, fold(*child)),
        Query::Limit { n, child } => Query::limit(n, fold(*child)),
        Query::Offset { n, child } => Query::offset(n, fold(*child)),
        Query::OrderBy { selections, child } => Query::order_by(selections, fold(*child)),
        Query::Count { name, child } => Query::count(name, fold(*child)),
        Query::TransformCursor { transform, child } => Query::TransformCursor {
            transform,
            child: Box::new(fold(*child)),
        },
        Query::Skipped => Query::Skipped,
        Query::Empty => Query::Empty,
    }
}

/// Entry point for phase 5.
pub fn fold_skip_include(selection: Query) -> Query {
    fold(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // (sense, condition value, expect suppressed) — suppress = value == sense.
    #[test_case(true, true, true; "skip sense true with condition true suppresses")]
    #[test_case(true, false, false; "skip sense true with condition false keeps child")]
    #[test_case(false, true, false; "include sense false with condition true keeps child")]
    #[test_case(false, false, true; "include sense false with condition false suppresses")]
    fn constant_condition_folds_per_truth_table(sense: bool, value: bool, expect_suppressed: bool) {
        let child = Query::leaf("name", vec![]);
        let tree = Query::Skip {
            sense,
            cond: SkipCondition::Constant(value),
            child: Box::new(child.clone()),
        };
        let result = fold_skip_include(tree);
        if expect_suppressed {
            assert_eq!(result, Query::Skipped);
        } else {
            assert_eq!(result, child);
        }
    }

    #[test]
    fn variable_condition_is_preserved() {
        let tree = Query::Skip {
            sense: true,
            cond: SkipCondition::Variable("flag".to_string()),
            child: Box::new(Query::leaf("name", vec![])),
        };
        assert!(matches!(fold_skip_include(tree), Query::Skip { .. }));
    }

    #[test]
    fn folds_inside_nested_groups() {
        let tree = Query::Group(vec![
            Query::leaf("id", vec![]),
            Query::Skip {
                sense: true,
                cond: SkipCondition::Constant(true),
                child: Box::new(Query::leaf("name", vec![])),
            },
        ]);
        match fold_skip_include(tree) {
            Query::Group(items) => {
                assert_eq!(items[1], Query::Skipped);
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }
}
