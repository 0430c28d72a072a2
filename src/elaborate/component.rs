//! Phase 6 — component boundary elaboration (spec §4.F.6). For each field
//! whose owning type's mapping delegates it to a different interpreter, the
//! selection is wrapped as `Wrap(fieldName, Component(target, join,
//! Select(fieldName, args, child)))`. Unlike phase 2, this phase
//! short-circuits (spec §7): a component boundary that can't be resolved
//! correctly means the plan can no longer be routed to the right
//! interpreter, so nothing downstream can be trusted — `Outcome::traverse`
//! and `Outcome::and_then` are used directly rather than the
//! warning-with-passthrough style of [`crate::elaborate::select`].

use crate::mapping::ObjectMapping;
use crate::query::{Join, Query};
use crate::result::Outcome;
use crate::schema::{SchemaFacade, TypeRef};
use std::collections::HashMap;

/// A table of per-type object mappings (spec §6.3), keyed by the type the
/// mapping was declared against.
#[derive(Default)]
pub struct ComponentElaborator {
    mappings: HashMap<TypeRef, ObjectMapping>,
}

impl ComponentElaborator {
    pub fn empty() -> Self {
        ComponentElaborator::default()
    }

    pub fn builder() -> ComponentElaboratorBuilder {
        ComponentElaboratorBuilder::default()
    }

    fn mapping_for(&self, tpe: &TypeRef) -> Option<&ObjectMapping> {
        self.mappings.get(tpe)
    }
}

#[derive(Default)]
pub struct ComponentElaboratorBuilder {
    mappings: HashMap<TypeRef, ObjectMapping>,
}

impl ComponentElaboratorBuilder {
    pub fn new() -> Self {
        ComponentElaboratorBuilder::default()
    }

    pub fn with_mapping(mut self, mapping: ObjectMapping) -> Self {
        self.mappings.insert(mapping.type_ref.clone(), mapping);
        self
    }

    pub fn build(self) -> ComponentElaborator {
        ComponentElaborator {
            mappings: self.mappings,
        }
    }
}

fn elaborate(
    q: Query,
    focus: TypeRef,
    schema: &dyn SchemaFacade,
    elaborator: &ComponentElaborator,
) -> Outcome<Query> {
    match q {
        Query::Select { name, args, child } => {
            let next_focus = schema.field_type(&focus, &name);
            let child_outcome = match &next_focus {
                Some(nf) => elaborate(*child, nf.clone(), schema, elaborator),
                None => Outcome::Success(*child),
            };
            child_outcome.and_then(|elaborated_child| {
                let rebuilt = Query::select(name.clone(), args.clone(), elaborated_child);
                let delegate = elaborator
                    .mapping_for(&focus)
                    .and_then(|m| m.delegate_for(&name));
                match delegate {
                    Some(target) => match &rebuilt {
                        Query::Select { name, args, child } => {
                            log::debug!("delegating field '{name}' on '{}' to component target", focus.name);
                            Outcome::Success(Query::wrap(
                                name.clone(),
                                Query::Component {
                                    mapping: target.clone(),
                                    join: Join::Trivial,
                                    child: Box::new(Query::select(name.clone(), args.clone(), (**child).clone())),
                                },
                            ))
                        }
                        _ => unreachable!("rebuilt is always a Select"),
                    },
                    None => Outcome::Success(rebuilt),
                }
            })
        }
        Query::Group(items) => {
            Outcome::<()>::traverse(items, |c| elaborate(c, focus.clone(), schema, elaborator)).map(Query::Group)
        }
        Query::Unique(c) => elaborate(*c, focus, schema, elaborator).map(Query::unique),
        Query::Filter(pred, c) => elaborate(*c, focus, schema, elaborator).map(|c| Query::filter(pred, c)),
        Query::Component { mapping, join, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::Component {
                mapping,
                join,
                child: Box::new(c),
            })
        }
        Query::Effect { handler, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::Effect { handler, child: Box::new(c) })
        }
        Query::Introspect { schema: s, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::Introspect { schema: s, child: Box::new(c) })
        }
        Query::Environment { env, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::Environment { env, child: Box::new(c) })
        }
        Query::Wrap { name, child } => elaborate(*child, focus, schema, elaborator).map(|c| Query::wrap(name, c)),
        Query::Rename { name, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::rename(name, c))
        }
        Query::UntypedNarrow { type_name, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::UntypedNarrow {
                type_name,
                child: Box::new(c),
            })
        }
        Query::Narrow { subtype, child } => {
            let next = subtype.clone();
            elaborate(*child, next, schema, elaborator).map(|c| Query::narrow(subtype, c))
        }
        Query::Skip { sense, cond, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::Skip { sense, cond, child: Box::new(c) })
        }
        Query::Limit { n, child } => elaborate(*child, focus, schema, elaborator).map(|c| Query::limit(n, c)),
        Query::Offset { n, child } => elaborate(*child, focus, schema, elaborator).map(|c| Query::offset(n, c)),
        Query::OrderBy { selections, child } => {
            elaborate(*child, focus, schema, elaborator).map(|c| Query::order_by(selections, c))
        }
        Query::Count { name, child } => elaborate(*child, focus, schema, elaborator).map(|c| Query::count(name, c)),
        Query::TransformCursor { transform, child } => elaborate(*child, focus, schema, elaborator)
            .map(|c| Query::TransformCursor { transform, child: Box::new(c) }),
        Query::Skipped => Outcome::Success(Query::Skipped),
        Query::Empty => Outcome::Success(Query::Empty),
    }
}

/// Entry point for phase 6. `root_type` is the operation's root type (e.g.
/// the schema's `Query`/`Mutation` root).
pub fn elaborate_components(
    selection: Query,
    root_type: TypeRef,
    schema: &dyn SchemaFacade,
    elaborator: &ComponentElaborator,
) -> Outcome<Query> {
    elaborate(selection, root_type, schema, elaborator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldMapping;
    use crate::query::MappingRef;
    use crate::schema::static_schema::component_schema;

    fn root(schema: &impl SchemaFacade) -> TypeRef {
        schema.lookup_type("Query").expect("Query declared")
    }

    #[test]
    fn wraps_delegated_field_in_component() {
        let schema = component_schema();
        let query_type = root(&schema);
        let elaborator = ComponentElaborator::builder()
            .with_mapping(ObjectMapping::new(
                "MA",
                query_type.clone(),
                vec![FieldMapping::Delegate {
                    field_name: "componenta".to_string(),
                    target: MappingRef::new("MA"),
                }],
            ))
            .build();

        let tree = Query::select("componenta", vec![], Query::leaf("fielda1", vec![]));
        let result = elaborate_components(tree, query_type, &schema, &elaborator);
        assert!(!result.is_failure());
        match result.value().unwrap() {
            Query::Wrap { name, child } => {
                assert_eq!(name, "componenta");
                match child.as_ref() {
                    Query::Component { mapping, join, .. } => {
                        assert_eq!(mapping, &MappingRef::new("MA"));
                        assert_eq!(join, &Join::Trivial);
                    }
                    other => panic!("expected Component, got {other:?}"),
                }
            }
            other => panic!("expected Wrap, got {other:?}"),
        }
    }

    #[test]
    fn nested_delegation_wraps_only_the_delegated_field() {
        let schema = component_schema();
        let query_type = root(&schema);
        let field_a2 = schema.lookup_type("FieldA2").unwrap();

        let elaborator = ComponentElaborator::builder()
            .with_mapping(ObjectMapping::new(
                "MA",
                query_type.clone(),
                vec![FieldMapping::Delegate {
                    field_name: "componenta".to_string(),
                    target: MappingRef::new("MA"),
                }],
            ))
            .with_mapping(ObjectMapping::new(
                "MB",
                field_a2,
                vec![FieldMapping::Delegate {
                    field_name: "componentb".to_string(),
                    target: MappingRef::new("MB"),
                }],
            ))
            .build();

        let tree = Query::select(
            "componenta",
            vec![],
            Query::Group(vec![
                Query::leaf("fielda1", vec![]),
                Query::select(
                    "fielda2",
                    vec![],
                    Query::select("componentb", vec![], Query::leaf("fieldb1", vec![])),
                ),
            ]),
        );
        let result = elaborate_components(tree, query_type, &schema, &elaborator);
        assert!(!result.is_failure());

        match result.value().unwrap() {
            Query::Wrap { child, .. } => match child.as_ref() {
                Query::Component { child, .. } => match child.as_ref() {
                    Query::Select { child, .. } => match child.as_ref() {
                        Query::Group(items) => {
                            assert!(matches!(items[0], Query::Select { .. }));
                            assert!(matches!(items[1], Query::Select { .. }));
                            match &items[1] {
                                Query::Select { child, .. } => {
                                    assert!(matches!(child.as_ref(), Query::Wrap { .. }));
                                }
                                other => panic!("expected Select, got {other:?}"),
                            }
                        }
                        other => panic!("expected Group, got {other:?}"),
                    },
                    other => panic!("expected inner Select, got {other:?}"),
                },
                other => panic!("expected Component, got {other:?}"),
            },
            other => panic!("expected Wrap, got {other:?}"),
        }
    }

    #[test]
    fn undelegated_field_passes_through() {
        let schema = component_schema();
        let query_type = root(&schema);
        let tree = Query::select("componenta", vec![], Query::leaf("fielda1", vec![]));
        let result = elaborate_components(tree.clone(), query_type, &schema, &ComponentElaborator::empty());
        assert_eq!(result.value(), Some(&tree));
    }
}
