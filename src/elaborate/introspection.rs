//! Phase 3 — introspection hoisting (spec §4.F.3). Any top-level selection
//! of `__schema` or `__type` is wrapped in `Introspect(schema, …)`; from
//! that point the subtree evaluates against schema metadata rather than the
//! ambient cursor. Disabled entirely when
//! [`crate::config::ElaboratorConfig::introspection_enabled`] is false, in
//! which case a `__schema`/`__type` selection is left as an ordinary field
//! (and will fail schema validation downstream, since no real schema
//! declares those fields).

use crate::config::ElaboratorConfig;
use crate::query::Query;

const SCHEMA_META_FIELD: &str = "__schema";
const TYPE_META_FIELD: &str = "__type";

fn is_introspection_field(name: &str) -> bool {
    name == SCHEMA_META_FIELD || name == TYPE_META_FIELD
}

/// Entry point for phase 3. `schema_name` identifies the metadata source the
/// resulting `Introspect` node evaluates against (opaque to the core; spec
/// §3's `Introspect(schema, child)`).
pub fn hoist_introspection(q: Query, schema_name: &str, config: &ElaboratorConfig) -> Query {
    if !config.introspection_enabled {
        return q;
    }
    match q {
        Query::Select { name, args, child } if is_introspection_field(&name) => {
            let rewritten_child = hoist_introspection(*child, schema_name, config);
            Query::Introspect {
                schema: schema_name.to_string(),
                child: Box::new(Query::select(name, args, rewritten_child)),
            }
        }
        Query::Select { name, args, child } => {
            Query::select(name, args, hoist_introspection(*child, schema_name, config))
        }
        Query::Group(items) => Query::Group(
            items
                .into_iter()
                .map(|item| hoist_introspection(item, schema_name, config))
                .collect(),
        ),
        Query::Rename { name, child } => {
            Query::rename(name, hoist_introspection(*child, schema_name, config))
        }
        Query::Wrap { name, child } => Query::wrap(name, hoist_introspection(*child, schema_name, config)),
        Query::Skip { sense, cond, child } => Query::Skip {
            sense,
            cond,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::UntypedNarrow { type_name, child } => Query::UntypedNarrow {
            type_name,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::Narrow { subtype, child } => {
            Query::narrow(subtype, hoist_introspection(*child, schema_name, config))
        }
        Query::Unique(c) => Query::unique(hoist_introspection(*c, schema_name, config)),
        Query::Filter(pred, c) => Query::filter(pred, hoist_introspection(*c, schema_name, config)),
        Query::Component { mapping, join, child } => Query::Component {
            mapping,
            join,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::Effect { handler, child } => Query::Effect {
            handler,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::Introspect { schema, child } => Query::Introspect {
            schema,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::Environment { env, child } => Query::Environment {
            env,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::Limit { n, child } => Query::limit(n, hoist_introspection(*child, schema_name, config)),
        Query::Offset { n, child } => Query::offset(n, hoist_introspection(*child, schema_name, config)),
        Query::OrderBy { selections, child } => {
            Query::order_by(selections, hoist_introspection(*child, schema_name, config))
        }
        Query::Count { name, child } => Query::count(name, hoist_introspection(*child, schema_name, config)),
        Query::TransformCursor { transform, child } => Query::TransformCursor {
            transform,
            child: Box::new(hoist_introspection(*child, schema_name, config)),
        },
        Query::Skipped => Query::Skipped,
        Query::Empty => Query::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_schema_introspection_field() {
        let tree = Query::select(
            "__schema",
            vec![],
            Query::select("queryType", vec![], Query::leaf("name", vec![])),
        );
        let hoisted = hoist_introspection(tree, "graphql", &ElaboratorConfig::default());
        match hoisted {
            Query::Introspect { schema, .. } => assert_eq!(schema, "graphql"),
            other => panic!("expected Introspect, got {other:?}"),
        }
    }

    #[test]
    fn leaves_ordinary_fields_untouched() {
        let tree = Query::leaf("name", vec![]);
        let hoisted = hoist_introspection(tree.clone(), "graphql", &ElaboratorConfig::default());
        assert_eq!(hoisted, tree);
    }

    #[test]
    fn disabled_config_skips_hoisting() {
        let tree = Query::leaf("__schema", vec![]);
        let config = ElaboratorConfig {
            introspection_enabled: false,
            ..ElaboratorConfig::default()
        };
        let hoisted = hoist_introspection(tree.clone(), "graphql", &config);
        assert_eq!(hoisted, tree);
    }

    #[test]
    fn hoists_only_at_its_own_level_not_nested_siblings() {
        let tree = Query::Group(vec![
            Query::leaf("id", vec![]),
            Query::select("__type", vec![], Query::leaf("name", vec![])),
        ]);
        let hoisted = hoist_introspection(tree, "graphql", &ElaboratorConfig::default());
        match hoisted {
            Query::Group(items) => {
                assert!(matches!(items[0], Query::Select { .. }));
                assert!(matches!(items[1], Query::Introspect { .. }));
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }
}
