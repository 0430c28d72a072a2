//! # Value & Binding Model
//!
//! [`Value`] is a tagged union of literal GraphQL values plus the pre-elaboration
//! "untyped" variants the parser may still be carrying (`UntypedEnumValue`,
//! `UntypedVariableValue`, `AbsentValue`). Elaboration (spec §4.A) maps those
//! to typed variants using the field's declared input type; after a
//! successful compile, no `Untyped*` variant remains reachable from a plan
//! node (spec P5).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Id(String),
    Enum(String),
    Null,
    /// A required argument explicitly absent from the operation text,
    /// pending default-substitution or a `MissingRequired` failure.
    Absent,
    List(Vec<Value>),
    /// Field order is semantically irrelevant but preserved for rendering.
    Object(Vec<(String, Value)>),
    Variable(String),

    /// Parse-time: an enum value whose name has not yet been checked against
    /// the field's declared enum type.
    UntypedEnumValue(String),
    /// Parse-time: a variable reference (`$name`) not yet resolved against
    /// the operation's variable definitions.
    UntypedVariableValue(String),
}

impl Value {
    pub fn is_untyped(&self) -> bool {
        matches!(
            self,
            Value::UntypedEnumValue(_) | Value::UntypedVariableValue(_)
        )
    }

    /// Recursively checks whether any untyped variant is reachable from this
    /// value (spec P5, applied transitively through `List`/`Object`).
    pub fn contains_untyped(&self) -> bool {
        match self {
            Value::UntypedEnumValue(_) | Value::UntypedVariableValue(_) => true,
            Value::List(items) => items.iter().any(Value::contains_untyped),
            Value::Object(fields) => fields.iter().any(|(_, v)| v.contains_untyped()),
            _ => false,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(n) => n.to_string(),
            Value::String(s) => format!("\"{s}\""),
            Value::Boolean(b) => b.to_string(),
            Value::Id(s) => format!("\"{s}\""),
            Value::Enum(name) => name.clone(),
            Value::Null => "null".to_string(),
            Value::Absent => "<absent>".to_string(),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(Value::render).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Object(fields) => {
                let rendered: Vec<String> = fields
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", value.render()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Variable(name) => format!("${name}"),
            Value::UntypedEnumValue(name) => format!("<untyped-enum {name}>"),
            Value::UntypedVariableValue(name) => format!("<untyped-var ${name}>"),
        }
    }
}

/// An argument to a field selection. Ordering is irrelevant to semantics;
/// duplicate names within the same argument list are forbidden by the
/// elaborator's argument-resolution step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Binding {
            name: name.into(),
            value,
        }
    }

    pub fn render(&self) -> String {
        format!("{}: {}", self.name, self.value.render())
    }
}

/// Checks a binding list for duplicate argument names (spec §3 Binding invariant).
pub fn has_duplicate_names(bindings: &[Binding]) -> bool {
    for (i, a) in bindings.iter().enumerate() {
        for b in &bindings[i + 1..] {
            if a.name == b.name {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_nested_untyped_values() {
        let value = Value::List(vec![Value::Int(1), Value::UntypedVariableValue("x".into())]);
        assert!(value.contains_untyped());
    }

    #[test]
    fn typed_tree_has_no_untyped_values() {
        let value = Value::Object(vec![("id".into(), Value::Id("1000".into()))]);
        assert!(!value.contains_untyped());
    }

    #[test]
    fn duplicate_binding_names_detected() {
        let bindings = vec![
            Binding::new("id", Value::Int(1)),
            Binding::new("id", Value::Int(2)),
        ];
        assert!(has_duplicate_names(&bindings));
    }

    #[test]
    fn render_object_preserves_field_order() {
        let value = Value::Object(vec![
            ("b".into(), Value::Int(2)),
            ("a".into(), Value::Int(1)),
        ]);
        assert_eq!(value.render(), "{b: 2, a: 1}");
    }
}
