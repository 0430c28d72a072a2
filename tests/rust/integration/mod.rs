//! End-to-end coverage of the full eight-phase pipeline, exercised as an
//! external consumer of the crate (no access to private module internals).
//! Each scenario here mirrors a worked example from the algebra's design
//! notes: a handler-driven unique lookup, alias expansion surviving merge,
//! mutation root tagging, a rejected leaf subselection, a cross-component
//! delegation, and introspection hoisting.

use gql_algebra::{
    compile_operation, CompileError, ComponentElaborator, FieldMapping, ObjectMapping,
    OperationKind, Outcome, Query, SchemaFacade, SelectElaborator,
};
use gql_algebra::schema::static_schema::{
    character_schema, component_schema, introspection_schema, mutation_schema, user_schema,
};
use gql_algebra::effect::{UntypedOperation, UntypedOperationKind};
use gql_algebra::query::{Join, MappingRef};
use gql_algebra::term::{FieldPath, Predicate, Term};
use gql_algebra::value::{Binding, Value};
use std::collections::HashMap;

fn query_root(schema: &impl SchemaFacade) -> gql_algebra::TypeRef {
    schema.lookup_type("Query").expect("Query type declared")
}

#[test]
fn unique_lookup_via_per_type_handler() {
    gql_algebra::init_logging();
    let schema = character_schema();
    let query_type = query_root(&schema);

    let select_elaborator = SelectElaborator::builder()
        .with_handler(query_type.clone(), |name, args, field_type, child| {
            if name == "character" {
                if let Some(id_arg) = args.iter().find(|b| b.name == "id") {
                    let pred = Predicate::Eql(
                        Term::Field(FieldPath::new(field_type.clone(), "id")),
                        Term::Const(id_arg.value.clone()),
                    );
                    return Outcome::Success(Query::select(
                        name,
                        Vec::new(),
                        Query::unique(Query::filter(pred, child)),
                    ));
                }
            }
            Outcome::Success(Query::select(name, args.to_vec(), child))
        })
        .build();

    let op = UntypedOperation {
        kind: UntypedOperationKind::Query,
        name: None,
        variables: Vec::new(),
        selection: Query::select(
            "character",
            vec![Binding::new("id", Value::String("1000".into()))],
            Query::leaf("name", vec![]),
        ),
    };

    let result = compile_operation(
        op,
        &schema,
        &HashMap::new(),
        &select_elaborator,
        &ComponentElaborator::empty(),
        &gql_algebra::config::ElaboratorConfig::default(),
    );

    assert!(!result.is_failure(), "problems: {:?}", result.problems());
    let operation = result.value().unwrap();
    assert_eq!(
        operation.plan.render(),
        "character{ Unique(Filter(Eql(Character/\"id\", \"1000\"), name)) }"
    );
}

#[test]
fn aliased_fields_with_different_arguments_survive_merge_distinct() {
    let schema = user_schema();
    let query_type = query_root(&schema);

    let op = UntypedOperation {
        kind: UntypedOperationKind::Query,
        name: None,
        variables: Vec::new(),
        selection: Query::select(
            "user",
            vec![Binding::new("id", Value::Int(4))],
            Query::Group(vec![
                Query::rename(
                    "smallPic",
                    Query::leaf("profilePic", vec![Binding::new("size", Value::Int(64))]),
                ),
                Query::rename(
                    "bigPic",
                    Query::leaf("profilePic", vec![Binding::new("size", Value::Int(1024))]),
                ),
            ]),
        ),
    };

    let result = compile_operation(
        op,
        &schema,
        &HashMap::new(),
        &SelectElaborator::empty(),
        &ComponentElaborator::empty(),
        &gql_algebra::config::ElaboratorConfig::default(),
    );

    assert!(!result.is_failure(), "problems: {:?}", result.problems());
    let operation = result.value().unwrap();
    assert_eq!(operation.root_type.name, query_type.name);
    match &operation.plan {
        Query::Select { name, child, .. } => {
            assert_eq!(name, "user");
            match child.as_ref() {
                Query::Group(items) => {
                    assert_eq!(items.len(), 2, "distinct aliases must not collapse into one selection");
                    for item in items {
                        assert!(matches!(item, Query::Rename { .. }));
                    }
                }
                other => panic!("expected Group of two aliased selections, got {other:?}"),
            }
        }
        other => panic!("expected top-level user Select, got {other:?}"),
    }
}

#[test]
fn mutation_operation_is_tagged_and_rooted_at_mutation_type() {
    let schema = mutation_schema();

    let op = UntypedOperation {
        kind: UntypedOperationKind::Mutation,
        name: Some("RenameCharacter".to_string()),
        variables: Vec::new(),
        selection: Query::select(
            "update_character",
            vec![
                Binding::new("id", Value::String("1000".into())),
                Binding::new("name", Value::String("Luke".into())),
            ],
            Query::select(
                "character",
                vec![],
                Query::leaf("name", vec![]),
            ),
        ),
    };

    let result = compile_operation(
        op,
        &schema,
        &HashMap::new(),
        &SelectElaborator::empty(),
        &ComponentElaborator::empty(),
        &gql_algebra::config::ElaboratorConfig::default(),
    );

    assert!(!result.is_failure(), "problems: {:?}", result.problems());
    let operation = result.value().unwrap();
    assert_eq!(operation.kind, OperationKind::Mutation);
    assert_eq!(operation.root_type.name, "Mutation");
}

#[test]
fn leaf_with_subselection_fails_the_whole_compile() {
    let schema = character_schema();

    let op = UntypedOperation {
        kind: UntypedOperationKind::Query,
        name: None,
        variables: Vec::new(),
        selection: Query::select(
            "character",
            vec![Binding::new("id", Value::String("1000".into()))],
            Query::select("name", vec![], Query::leaf("x", vec![])),
        ),
    };

    let result = compile_operation(
        op,
        &schema,
        &HashMap::new(),
        &SelectElaborator::empty(),
        &ComponentElaborator::empty(),
        &gql_algebra::config::ElaboratorConfig::default(),
    );

    assert!(result.is_failure());
    assert!(result
        .problems()
        .iter()
        .any(|p| matches!(&p.error, CompileError::LeafSubselection { field, tpe }
            if field == "name" && tpe == "Character")));
}

#[test]
fn component_boundary_wraps_only_the_delegated_fields() {
    let schema = component_schema();
    let query_type = query_root(&schema);
    let field_a2 = schema.lookup_type("FieldA2").expect("FieldA2 declared");

    let component_elaborator = ComponentElaborator::builder()
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

    let op = UntypedOperation {
        kind: UntypedOperationKind::Query,
        name: None,
        variables: Vec::new(),
        selection: Query::select(
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
        ),
    };

    let result = compile_operation(
        op,
        &schema,
        &HashMap::new(),
        &SelectElaborator::empty(),
        &component_elaborator,
        &gql_algebra::config::ElaboratorConfig::default(),
    );

    assert!(!result.is_failure(), "problems: {:?}", result.problems());
    let operation = result.value().unwrap();

    match &operation.plan {
        Query::Wrap { name, child } => {
            assert_eq!(name, "componenta");
            match child.as_ref() {
                Query::Component { mapping, join, child } => {
                    assert_eq!(mapping, &MappingRef::new("MA"));
                    assert_eq!(join, &Join::Trivial);
                    match child.as_ref() {
                        Query::Select { name, child, .. } => {
                            assert_eq!(name, "componenta");
                            match child.as_ref() {
                                Query::Group(items) => {
                                    assert!(matches!(items[0], Query::Select { .. }));
                                    match &items[1] {
                                        Query::Select { name, child, .. } => {
                                            assert_eq!(name, "fielda2");
                                            match child.as_ref() {
                                                Query::Wrap { name, child } => {
                                                    assert_eq!(name, "componentb");
                                                    assert!(matches!(
                                                        child.as_ref(),
                                                        Query::Component { .. }
                                                    ));
                                                }
                                                other => panic!(
                                                    "expected componentb Wrap, got {other:?}"
                                                ),
                                            }
                                        }
                                        other => panic!("expected fielda2 Select, got {other:?}"),
                                    }
                                }
                                other => panic!("expected Group of two fields, got {other:?}"),
                            }
                        }
                        other => panic!("expected inner componenta Select, got {other:?}"),
                    }
                }
                other => panic!("expected Component, got {other:?}"),
            }
        }
        other => panic!("expected top-level Wrap, got {other:?}"),
    }
}

#[test]
fn schema_introspection_query_is_hoisted_into_introspect_node() {
    let schema = introspection_schema();

    let op = UntypedOperation {
        kind: UntypedOperationKind::Query,
        name: None,
        variables: Vec::new(),
        selection: Query::select(
            "__schema",
            vec![],
            Query::select("queryType", vec![], Query::leaf("name", vec![])),
        ),
    };

    let result = compile_operation(
        op,
        &schema,
        &HashMap::new(),
        &SelectElaborator::empty(),
        &ComponentElaborator::empty(),
        &gql_algebra::config::ElaboratorConfig::default(),
    );

    assert!(!result.is_failure(), "problems: {:?}", result.problems());
    let operation = result.value().unwrap();
    match &operation.plan {
        Query::Introspect { schema, child } => {
            assert_eq!(schema, "Query");
            match child.as_ref() {
                Query::Select { name, .. } => assert_eq!(name, "__schema"),
                other => panic!("expected wrapped __schema Select, got {other:?}"),
            }
        }
        other => panic!("expected top-level Introspect, got {other:?}"),
    }
}

#[test]
fn merge_collapses_duplicate_empty_leaf_selections() {
    let result = gql_algebra::rewrite::merge_queries(&[
        Query::leaf("a", vec![]),
        Query::leaf("a", vec![]),
    ]);
    assert_eq!(result.value().unwrap().render(), "a");
}

#[test]
fn merge_groups_children_of_same_named_selections() {
    let result = gql_algebra::rewrite::merge_queries(&[
        Query::select("a", vec![], Query::leaf("x", vec![])),
        Query::select("a", vec![], Query::leaf("y", vec![])),
    ]);
    assert_eq!(result.value().unwrap().render(), "a{ { x, y } }");
}

#[test]
fn merge_leaves_conflicting_arguments_unmerged_with_a_warning() {
    let result = gql_algebra::rewrite::merge_queries(&[
        Query::leaf("a", vec![Binding::new("x", Value::Int(1))]),
        Query::leaf("a", vec![Binding::new("x", Value::Int(2))]),
    ]);
    assert!(matches!(result, Outcome::Warning(_, _)));
    match result.value().unwrap() {
        Query::Group(items) => assert_eq!(items.len(), 2),
        other => panic!("expected Group, got {other:?}"),
    }
}

