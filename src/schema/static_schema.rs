//! An in-memory [`SchemaFacade`] fixture used by this crate's own tests.
//! Not a schema loader — real schema construction (from SDL, introspection,
//! or a database catalog) is an external collaborator's job (spec §1).

use super::{InputValue, OperationKind, SchemaFacade, TypeId, TypeRef};
use crate::value::Value;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct FieldDescription {
    return_type: TypeId,
    arguments: Vec<InputValue>,
}

#[derive(Debug, Clone)]
struct TypeDescription {
    name: String,
    leaf: bool,
    fields: HashMap<String, FieldDescription>,
    /// Concrete member types, non-empty only for interface/union-like types.
    possible_types: Vec<TypeId>,
}

/// A schema built entirely in memory, keyed by name via a flat type arena.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    types: Vec<TypeDescription>,
    by_name: HashMap<String, TypeId>,
    query_root: Option<TypeId>,
    mutation_root: Option<TypeId>,
}

impl StaticSchema {
    pub fn builder() -> StaticSchemaBuilder {
        StaticSchemaBuilder::default()
    }

    fn type_ref(&self, id: TypeId) -> TypeRef {
        TypeRef::new(id, self.types[id.0 as usize].name.clone())
    }
}

impl SchemaFacade for StaticSchema {
    fn lookup_type(&self, name: &str) -> Option<TypeRef> {
        self.by_name.get(name).map(|id| self.type_ref(*id))
    }

    fn field_type(&self, tpe: &TypeRef, field: &str) -> Option<TypeRef> {
        let desc = self.types.get(tpe.id.0 as usize)?;
        let field_desc = desc.fields.get(field)?;
        Some(self.type_ref(field_desc.return_type))
    }

    fn field_arguments(&self, tpe: &TypeRef, field: &str) -> Option<Vec<InputValue>> {
        let desc = self.types.get(tpe.id.0 as usize)?;
        desc.fields.get(field).map(|f| f.arguments.clone())
    }

    fn is_leaf(&self, tpe: &TypeRef) -> bool {
        self.types
            .get(tpe.id.0 as usize)
            .map(|d| d.leaf)
            .unwrap_or(false)
    }

    fn possible_types(&self, tpe: &TypeRef) -> Vec<TypeRef> {
        self.types
            .get(tpe.id.0 as usize)
            .map(|d| d.possible_types.iter().map(|id| self.type_ref(*id)).collect())
            .unwrap_or_default()
    }

    fn root_operation(&self, op: OperationKind) -> Option<TypeRef> {
        let id = match op {
            OperationKind::Query => self.query_root,
            OperationKind::Mutation => self.mutation_root,
            OperationKind::Subscription => None,
        }?;
        Some(self.type_ref(id))
    }
}

#[derive(Default)]
pub struct StaticSchemaBuilder {
    schema: StaticSchema,
}

impl StaticSchemaBuilder {
    pub fn leaf_type(mut self, name: &str) -> Self {
        self.push_type(name, true, Vec::new());
        self
    }

    pub fn object_type(mut self, name: &str) -> Self {
        self.push_type(name, false, Vec::new());
        self
    }

    pub fn interface_type(mut self, name: &str, possible: &[&str]) -> Self {
        let possible_ids = possible
            .iter()
            .map(|n| *self.schema.by_name.get(*n).expect("possible type already declared"))
            .collect();
        self.push_type(name, false, possible_ids);
        self
    }

    fn push_type(&mut self, name: &str, leaf: bool, possible_types: Vec<TypeId>) {
        let id = TypeId(self.schema.types.len() as u32);
        self.schema.types.push(TypeDescription {
            name: name.to_string(),
            leaf,
            fields: HashMap::new(),
            possible_types,
        });
        self.schema.by_name.insert(name.to_string(), id);
    }

    pub fn field(mut self, on: &str, name: &str, returns: &str) -> Self {
        self.add_field(on, name, returns, Vec::new());
        self
    }

    pub fn field_with_args(
        mut self,
        on: &str,
        name: &str,
        returns: &str,
        args: Vec<(&str, &str, bool, Option<Value>)>,
    ) -> Self {
        let arguments = args
            .into_iter()
            .map(|(arg_name, arg_type, required, default)| InputValue {
                name: arg_name.to_string(),
                declared_type: self.schema.lookup_type(arg_type).unwrap_or_else(|| {
                    TypeRef::new(TypeId(u32::MAX), arg_type.to_string())
                }),
                required,
                default,
            })
            .collect();
        self.add_field(on, name, returns, arguments);
        self
    }

    fn add_field(&mut self, on: &str, name: &str, returns: &str, arguments: Vec<InputValue>) {
        let owner = *self.schema.by_name.get(on).expect("owning type declared");
        let return_type = *self
            .schema
            .by_name
            .get(returns)
            .expect("return type declared");
        self.schema.types[owner.0 as usize].fields.insert(
            name.to_string(),
            FieldDescription {
                return_type,
                arguments,
            },
        );
    }

    pub fn query_root(mut self, name: &str) -> Self {
        self.schema.query_root = self.schema.by_name.get(name).copied();
        self
    }

    pub fn mutation_root(mut self, name: &str) -> Self {
        self.schema.mutation_root = self.schema.by_name.get(name).copied();
        self
    }

    pub fn build(self) -> StaticSchema {
        self.schema
    }
}

/// The `Character` schema used throughout spec §8's concrete scenarios.
pub fn character_schema() -> StaticSchema {
    StaticSchema::builder()
        .leaf_type("String")
        .leaf_type("Int")
        .leaf_type("ID")
        .object_type("Character")
        .object_type("Query")
        .field("Character", "id", "ID")
        .field("Character", "name", "String")
        .field_with_args(
            "Query",
            "character",
            "Character",
            vec![("id", "ID", true, None)],
        )
        .query_root("Query")
        .build()
}

/// The `User`/`profilePic` schema used by the alias-expansion scenario.
pub fn user_schema() -> StaticSchema {
    StaticSchema::builder()
        .leaf_type("String")
        .leaf_type("Int")
        .leaf_type("ID")
        .object_type("User")
        .object_type("Query")
        .field_with_args(
            "User",
            "profilePic",
            "String",
            vec![("size", "Int", false, Some(Value::Int(128)))],
        )
        .field_with_args("Query", "user", "User", vec![("id", "ID", true, None)])
        .query_root("Query")
        .build()
}

/// The mutation schema used by the mutation-tagging scenario.
pub fn mutation_schema() -> StaticSchema {
    StaticSchema::builder()
        .leaf_type("String")
        .leaf_type("ID")
        .object_type("Character")
        .object_type("UpdateCharacterPayload")
        .object_type("Query")
        .object_type("Mutation")
        .field("Character", "name", "String")
        .field("UpdateCharacterPayload", "character", "Character")
        .field_with_args(
            "Mutation",
            "update_character",
            "UpdateCharacterPayload",
            vec![("id", "ID", true, None), ("name", "String", false, None)],
        )
        .query_root("Query")
        .mutation_root("Mutation")
        .build()
}

/// The cross-component schema used by the component-boundary scenario:
/// `Query.componenta: ComponentA`, `FieldA2.componentb: ComponentB`.
pub fn component_schema() -> StaticSchema {
    StaticSchema::builder()
        .leaf_type("String")
        .object_type("Query")
        .object_type("ComponentA")
        .object_type("FieldA2")
        .object_type("ComponentB")
        .field("Query", "componenta", "ComponentA")
        .field("ComponentA", "fielda1", "String")
        .field("ComponentA", "fielda2", "FieldA2")
        .field("FieldA2", "componentb", "ComponentB")
        .field("ComponentB", "fieldb1", "String")
        .query_root("Query")
        .build()
}

/// The introspection scenario's schema: `Query.__schema: __Schema`,
/// `__Schema.queryType: __Type`, `__Type.name: String`, mirroring how a real
/// schema loader exposes the meta-fields as ordinary declared fields.
pub fn introspection_schema() -> StaticSchema {
    StaticSchema::builder()
        .leaf_type("String")
        .object_type("Query")
        .object_type("__Schema")
        .object_type("__Type")
        .field("Query", "__schema", "__Schema")
        .field("__Schema", "queryType", "__Type")
        .field("__Type", "name", "String")
        .query_root("Query")
        .build()
}
