//! Phase 4 — type-refinement normalization (spec §4.F.4). Every
//! `UntypedNarrow(typeName, child)` left over from parsing is resolved
//! against the schema into a typed `Narrow(subtype, child)`. A type name the
//! schema doesn't recognize fails with `UnknownType` — unlike phase 2, this
//! is not recoverable by falling back to an identity passthrough, since
//! nothing downstream can meaningfully interpret a dangling type-refinement
//! node.

use crate::error::CompileError;
use crate::query::Query;
use crate::result::Outcome;
use crate::schema::SchemaFacade;

fn normalize(q: Query, schema: &dyn SchemaFacade) -> Outcome<Query> {
    match q {
        Query::UntypedNarrow { type_name, child } => {
            match schema.lookup_type(&type_name) {
                None => {
                    log::warn!("unknown type '{type_name}' in type-refinement");
                    Outcome::failure_one(CompileError::unknown_type(type_name))
                }
                Some(subtype) => {
                    normalize(*child, schema).map(|c| Query::narrow(subtype, c))
                }
            }
        }
        Query::Select { name, args, child } => {
            normalize(*child, schema).map(|c| Query::select(name, args, c))
        }
        Query::Group(items) => {
            Outcome::<()>::traverse(items, |c| normalize(c, schema)).map(Query::Group)
        }
        Query::Unique(c) => normalize(*c, schema).map(Query::unique),
        Query::Filter(pred, c) => normalize(*c, schema).map(|c| Query::filter(pred, c)),
        Query::Component { mapping, join, child } => normalize(*child, schema).map(|c| Query::Component {
            mapping,
            join,
            child: Box::new(c),
        }),
        Query::Effect { handler, child } => {
            normalize(*child, schema).map(|c| Query::Effect { handler, child: Box::new(c) })
        }
        Query::Introspect { schema: s, child } => {
            normalize(*child, schema).map(|c| Query::Introspect { schema: s, child: Box::new(c) })
        }
        Query::Environment { env, child } => {
            normalize(*child, schema).map(|c| Query::Environment { env, child: Box::new(c) })
        }
        Query::Wrap { name, child } => normalize(*child, schema).map(|c| Query::wrap(name, c)),
        Query::Rename { name, child } => normalize(*child, schema).map(|c| Query::rename(name, c)),
        Query::Narrow { subtype, child } => {
            normalize(*child, schema).map(|c| Query::narrow(subtype, c))
        }
        Query::Skip { sense, cond, child } => {
            normalize(*child, schema).map(|c| Query::Skip { sense, cond, child: Box::new(c) })
        }
        Query::Limit { n, child } => normalize(*child, schema).map(|c| Query::limit(n, c)),
        Query::Offset { n, child } => normalize(*child, schema).map(|c| Query::offset(n, c)),
        Query::OrderBy { selections, child } => {
            normalize(*child, schema).map(|c| Query::order_by(selections, c))
        }
        Query::Count { name, child } => normalize(*child, schema).map(|c| Query::count(name, c)),
        Query::TransformCursor { transform, child } => normalize(*child, schema)
            .map(|c| Query::TransformCursor { transform, child: Box::new(c) }),
        Query::Skipped => Outcome::Success(Query::Skipped),
        Query::Empty => Outcome::Success(Query::Empty),
    }
}

/// Entry point for phase 4.
pub fn normalize_narrows(selection: Query, schema: &dyn SchemaFacade) -> Outcome<Query> {
    normalize(selection, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::static_schema::character_schema;

    #[test]
    fn resolves_known_type_name() {
        let schema = character_schema();
        let tree = Query::UntypedNarrow {
            type_name: "Character".to_string(),
            child: Box::new(Query::leaf("name", vec![])),
        };
        let result = normalize_narrows(tree, &schema);
        match result.value().unwrap() {
            Query::Narrow { subtype, .. } => assert_eq!(subtype.name, "Character"),
            other => panic!("expected Narrow, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_name_fails() {
        let schema = character_schema();
        let tree = Query::UntypedNarrow {
            type_name: "Wookiee".to_string(),
            child: Box::new(Query::leaf("name", vec![])),
        };
        let result = normalize_narrows(tree, &schema);
        assert!(result.is_failure());
    }

    #[test]
    fn descends_through_wrapper_nodes() {
        let schema = character_schema();
        let tree = Query::rename(
            "d",
            Query::UntypedNarrow {
                type_name: "Character".to_string(),
                child: Box::new(Query::leaf("name", vec![])),
            },
        );
        let result = normalize_narrows(tree, &schema);
        assert!(!result.is_failure());
    }
}
