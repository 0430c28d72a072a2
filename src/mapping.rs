//! `ObjectMapping`/`FieldMapping` (spec §6.3, illustrative interface to SQL
//! mappings). The core only cares about one field-mapping shape —
//! `Delegate`, which triggers phase 6 component insertion — and treats every
//! other kind as an opaque backend leaf it never inspects. Per spec, the
//! illustrative `SqlField`/`SqlObject`/`SqlRoot` variants collapse into a
//! single `FieldMapping::Backend(String)` payload here.

use crate::query::MappingRef;
use crate::schema::TypeRef;

/// One field's mapping within an [`ObjectMapping`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMapping {
    /// This field's selection lives in a different interpreter, identified
    /// by `target`. Triggers phase 6's `Wrap(fieldName, Component(...))`
    /// insertion.
    Delegate { field_name: String, target: MappingRef },
    /// An opaque backend-specific leaf (`SqlField`/`SqlObject`/`SqlRoot` and
    /// friends) the core never inspects.
    Backend(String),
}

impl FieldMapping {
    pub fn field_name(&self) -> Option<&str> {
        match self {
            FieldMapping::Delegate { field_name, .. } => Some(field_name),
            FieldMapping::Backend(_) => None,
        }
    }
}

/// A mapping document for one GraphQL object type: its symbolic name (used
/// to populate `Component`'s `mapping: MappingRef`) plus the per-field
/// mappings declared against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMapping {
    pub name: MappingRef,
    pub type_ref: TypeRef,
    pub fields: Vec<FieldMapping>,
}

impl ObjectMapping {
    pub fn new(name: impl Into<String>, type_ref: TypeRef, fields: Vec<FieldMapping>) -> Self {
        ObjectMapping {
            name: MappingRef::new(name),
            type_ref,
            fields,
        }
    }

    /// The delegation target for `field_name`, if this mapping delegates it
    /// elsewhere.
    pub fn delegate_for(&self, field_name: &str) -> Option<&MappingRef> {
        self.fields.iter().find_map(|f| match f {
            FieldMapping::Delegate { field_name: n, target } if n == field_name => Some(target),
            _ => None,
        })
    }
}
