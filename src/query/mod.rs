//! # Query Algebra
//!
//! [`Query`] is the compiled plan tree: a recursive algebra of ~20 node
//! kinds (spec §3's node table) plus the smart combinator [`Query::compose`]
//! implementing the spec's `~` composition. Plan trees are immutable once
//! constructed (spec §3 "Binding contexts / lifecycles"); every rewrite in
//! [`crate::rewrite`] and [`crate::elaborate`] produces a new tree rather
//! than mutating in place. Ownership is by construction — each node
//! exclusively owns its children via `Box`, never shared.

pub mod render;

use crate::schema::TypeRef;
use crate::term::{OrderSelection, Predicate};
use crate::value::Binding;

/// A symbolic reference to an object mapping living in another interpreter
/// (spec §6.3's `ObjectMapping`). The mapping's actual field-by-field
/// contents are opaque to the core — only its name is threaded through the
/// plan tree so a `Component` node can be rendered and later resolved by the
/// runtime interpreter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MappingRef(pub String);

impl MappingRef {
    pub fn new(name: impl Into<String>) -> Self {
        MappingRef(name.into())
    }
}

/// How a `Component`'s child cursor is produced from the parent cursor.
/// `Trivial` passes the parent cursor straight through; a `Named` join
/// identifies a join strategy the runtime interpreter must supply.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Join {
    Trivial,
    Named(String),
}

impl Join {
    pub fn render(&self) -> String {
        match self {
            Join::Trivial => "TrivialJoin".to_string(),
            Join::Named(name) => name.clone(),
        }
    }
}

/// A symbolic reference to an [`crate::effect::EffectHandler`] registered by
/// the runtime. Stored by name so the plan tree remains immutable,
/// cloneable, and serializable independent of any concrete effect runtime.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HandlerRef(pub String);

/// A symbolic reference to a registered cursor transform. The transform
/// function itself lives with the runtime interpreter; the plan tree only
/// carries its name (spec §9: "avoid open recursion", and plan trees must
/// stay pure data).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransformRef(pub String);

/// One frame of the ambient [`Env`] stack extended by an `Environment` node.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EnvFrame {
    pub bindings: Vec<(String, crate::value::Value)>,
}

/// An ordered stack of frames; lookup walks from innermost outward. Writes
/// push a new frame onto a clone of the parent, so the original remains
/// valid after extension (spec §3 "Binding contexts / lifecycles").
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Env {
    frames: Vec<EnvFrame>,
}

impl Env {
    pub fn empty() -> Self {
        Env { frames: Vec::new() }
    }

    pub fn extend(&self, bindings: Vec<(String, crate::value::Value)>) -> Self {
        let mut frames = self.frames.clone();
        frames.push(EnvFrame { bindings });
        Env { frames }
    }

    pub fn lookup(&self, name: &str) -> Option<&crate::value::Value> {
        for frame in self.frames.iter().rev() {
            if let Some((_, value)) = frame.bindings.iter().find(|(n, _)| n == name) {
                return Some(value);
            }
        }
        None
    }
}

/// The compiled plan tree (spec §3's node table).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Query {
    Select {
        name: String,
        args: Vec<Binding>,
        child: Box<Query>,
    },
    Group(Vec<Query>),
    Unique(Box<Query>),
    Filter(Predicate, Box<Query>),
    Component {
        mapping: MappingRef,
        join: Join,
        child: Box<Query>,
    },
    Effect {
        handler: HandlerRef,
        child: Box<Query>,
    },
    Introspect {
        schema: String,
        child: Box<Query>,
    },
    Environment {
        env: Env,
        child: Box<Query>,
    },
    Wrap {
        name: String,
        child: Box<Query>,
    },
    Rename {
        name: String,
        child: Box<Query>,
    },
    /// Parse-time type refinement; removed by the elaborator (spec phase 4).
    UntypedNarrow {
        type_name: String,
        child: Box<Query>,
    },
    Narrow {
        subtype: TypeRef,
        child: Box<Query>,
    },
    Skip {
        sense: bool,
        cond: SkipCondition,
        child: Box<Query>,
    },
    Limit {
        n: i64,
        child: Box<Query>,
    },
    Offset {
        n: i64,
        child: Box<Query>,
    },
    OrderBy {
        selections: Vec<OrderSelection>,
        child: Box<Query>,
    },
    Count {
        name: String,
        child: Box<Query>,
    },
    TransformCursor {
        transform: TransformRef,
        child: Box<Query>,
    },
    /// Placeholder for a subtree suppressed by `@skip`/`@include` folding.
    Skipped,
    /// Identity under merge.
    Empty,
}

/// The condition guarding a `Skip` node: either a constant (foldable at
/// elaboration time, spec phase 5) or a variable not yet resolved.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SkipCondition {
    Constant(bool),
    Variable(String),
}

impl Query {
    pub fn select(name: impl Into<String>, args: Vec<Binding>, child: Query) -> Query {
        let name = name.into();
        debug_assert!(!name.is_empty(), "Select name must be non-empty");
        Query::Select {
            name,
            args,
            child: Box::new(child),
        }
    }

    pub fn leaf(name: impl Into<String>, args: Vec<Binding>) -> Query {
        Query::select(name, args, Query::Empty)
    }

    pub fn unique(child: Query) -> Query {
        Query::Unique(Box::new(child))
    }

    pub fn filter(pred: Predicate, child: Query) -> Query {
        Query::Filter(pred, Box::new(child))
    }

    pub fn wrap(name: impl Into<String>, child: Query) -> Query {
        Query::Wrap {
            name: name.into(),
            child: Box::new(child),
        }
    }

    pub fn rename(name: impl Into<String>, child: Query) -> Query {
        Query::Rename {
            name: name.into(),
            child: Box::new(child),
        }
    }

    pub fn narrow(subtype: TypeRef, child: Query) -> Query {
        Query::Narrow {
            subtype,
            child: Box::new(child),
        }
    }

    pub fn limit(n: i64, child: Query) -> Query {
        debug_assert!(n >= 0, "Limit must be non-negative");
        Query::Limit {
            n,
            child: Box::new(child),
        }
    }

    pub fn offset(n: i64, child: Query) -> Query {
        debug_assert!(n >= 0, "Offset must be non-negative");
        Query::Offset {
            n,
            child: Box::new(child),
        }
    }

    pub fn order_by(selections: Vec<OrderSelection>, child: Query) -> Query {
        debug_assert!(!selections.is_empty(), "OrderBy selections must be non-empty");
        Query::OrderBy {
            selections,
            child: Box::new(child),
        }
    }

    pub fn count(name: impl Into<String>, child: Query) -> Query {
        Query::Count {
            name: name.into(),
            child: Box::new(child),
        }
    }

    /// Implements the spec's `~` combinator: `Group(a)~Group(b) = Group(a++b)`.
    /// `Empty` is deliberately not removed here — merge is responsible for that.
    pub fn compose(self, other: Query) -> Query {
        match (self, other) {
            (Query::Group(mut xs), Query::Group(ys)) => {
                xs.extend(ys);
                Query::Group(xs)
            }
            (Query::Group(mut xs), other) => {
                xs.push(other);
                Query::Group(xs)
            }
            (this, Query::Group(mut ys)) => {
                ys.insert(0, this);
                Query::Group(ys)
            }
            (a, b) => Query::Group(vec![a, b]),
        }
    }

    pub fn is_empty_node(&self) -> bool {
        matches!(self, Query::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_flattens_adjacent_groups() {
        let a = Query::Group(vec![Query::leaf("x", vec![])]);
        let b = Query::Group(vec![Query::leaf("y", vec![])]);
        let composed = a.compose(b);
        match composed {
            Query::Group(items) => assert_eq!(items.len(), 2),
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn compose_does_not_remove_empty() {
        let composed = Query::leaf("x", vec![]).compose(Query::Empty);
        match composed {
            Query::Group(items) => assert!(items.iter().any(|q| q.is_empty_node())),
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn env_lookup_walks_frames_innermost_first() {
        let env = Env::empty()
            .extend(vec![("x".into(), crate::value::Value::Int(1))])
            .extend(vec![("x".into(), crate::value::Value::Int(2))]);
        assert_eq!(env.lookup("x"), Some(&crate::value::Value::Int(2)));
    }

    #[test]
    fn env_extend_preserves_original() {
        let base = Env::empty().extend(vec![("x".into(), crate::value::Value::Int(1))]);
        let _extended = base.extend(vec![("y".into(), crate::value::Value::Int(2))]);
        assert_eq!(base.lookup("y"), None);
        assert_eq!(base.lookup("x"), Some(&crate::value::Value::Int(1)));
    }
}
