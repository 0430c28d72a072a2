//! # Predicate & Term Algebra
//!
//! `Term<T>` is a lazy projection from a cursor (external — spec glossary) to
//! a typed scalar; `Predicate` is a boolean `Term`. The algebra is closed
//! under Boolean composition; `Project` recursively enters the subcursor at
//! a path before evaluating its inner predicate (spec §4.C).

use crate::schema::TypeRef;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `TypeRef / "field"` — a term navigable by predicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPath {
    pub base: TypeRef,
    pub field: String,
}

impl FieldPath {
    pub fn new(base: TypeRef, field: &str) -> Self {
        FieldPath {
            base,
            field: field.to_string(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}/\"{}\"", self.base, self.field)
    }
}

/// A typed scalar projection evaluated against an external cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Term {
    Const(Value),
    Field(FieldPath),
}

impl Term {
    pub fn render(&self) -> String {
        match self {
            Term::Const(v) => v.render(),
            Term::Field(path) => path.render(),
        }
    }
}

/// A boolean [`Term`], closed under conjunction/disjunction/negation, with
/// relational and membership comparisons as leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    Eql(Term, Term),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
    Contains(Term, Term),
    Matches(Term, String),
    In(Term, Vec<Term>),
    /// Evaluates `inner` within the subcursor reached by following `path`.
    Project(FieldPath, Box<Predicate>),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    pub fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }

    /// Every `FieldPath` reachable from this predicate, used by the
    /// elaborator to check that a filter's free terms resolve against the
    /// child's focus type (spec §3 `Filter` invariant).
    pub fn free_paths(&self) -> Vec<&FieldPath> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a FieldPath>) {
        match self {
            Predicate::Eql(a, b) | Predicate::Contains(a, b) => {
                collect_term_path(a, out);
                collect_term_path(b, out);
            }
            Predicate::And(a, b) | Predicate::Or(a, b) => {
                a.collect_paths(out);
                b.collect_paths(out);
            }
            Predicate::Not(inner) => inner.collect_paths(out),
            Predicate::Matches(t, _) => collect_term_path(t, out),
            Predicate::In(t, terms) => {
                collect_term_path(t, out);
                for term in terms {
                    collect_term_path(term, out);
                }
            }
            Predicate::Project(path, inner) => {
                out.push(path);
                inner.collect_paths(out);
            }
        }
    }

    pub fn render(&self) -> String {
        match self {
            Predicate::Eql(a, b) => format!("Eql({}, {})", a.render(), b.render()),
            Predicate::And(a, b) => format!("And({}, {})", a.render(), b.render()),
            Predicate::Or(a, b) => format!("Or({}, {})", a.render(), b.render()),
            Predicate::Not(p) => format!("Not({})", p.render()),
            Predicate::Contains(a, b) => format!("Contains({}, {})", a.render(), b.render()),
            Predicate::Matches(t, pat) => format!("Matches({}, \"{pat}\")", t.render()),
            Predicate::In(t, terms) => {
                let rendered: Vec<String> = terms.iter().map(Term::render).collect();
                format!("In({}, [{}])", t.render(), rendered.join(", "))
            }
            Predicate::Project(path, inner) => {
                format!("Project({}, {})", path.render(), inner.render())
            }
        }
    }
}

fn collect_term_path<'a>(term: &'a Term, out: &mut Vec<&'a FieldPath>) {
    if let Term::Field(path) = term {
        out.push(path);
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// `(term, ascending, nullsLast)` — one leg of an `OrderBy` (spec §3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSelection {
    pub term: Term,
    pub ascending: bool,
    pub nulls_last: bool,
}

impl OrderSelection {
    pub fn new(term: Term, ascending: bool, nulls_last: bool) -> Self {
        OrderSelection {
            term,
            ascending,
            nulls_last,
        }
    }

    /// Compares two optional scalar values per spec §3's `OrderSelection`
    /// semantics: null vs null is equal, null vs value is ordered by
    /// `nulls_last`, value vs value uses `cmp` negated when descending.
    pub fn compare_values(&self, a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => {
                if self.nulls_last {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (Some(_), None) => {
                if self.nulls_last {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (Some(x), Some(y)) => {
                let ord = compare_scalars(x, y);
                if self.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            }
        }
    }
}

fn compare_scalars(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Id(x), Value::Id(y)) => x.cmp(y),
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        _ => std::cmp::Ordering::Equal,
    }
}

/// Lexicographic comparison over a sequence of [`OrderSelection`]s: the
/// first non-zero comparison wins (spec §3).
pub fn compare_rows(selections: &[(OrderSelection, Option<Value>, Option<Value>)]) -> std::cmp::Ordering {
    for (selection, a, b) in selections {
        let ord = selection.compare_values(a.as_ref(), b.as_ref());
        if ord != std::cmp::Ordering::Equal {
            return ord;
        }
    }
    std::cmp::Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{TypeId, TypeRef};

    fn character() -> TypeRef {
        TypeRef::new(TypeId(0), "Character")
    }

    #[test]
    fn free_paths_descend_through_project() {
        let path = character().path("id");
        let pred = Predicate::Project(
            path.clone(),
            Box::new(Predicate::Eql(
                Term::Field(path.clone()),
                Term::Const(Value::String("x".into())),
            )),
        );
        assert_eq!(pred.free_paths().len(), 2);
    }

    #[test]
    fn null_ordering_respects_nulls_last() {
        let selection = OrderSelection::new(Term::Const(Value::Null), true, true);
        assert_eq!(
            selection.compare_values(None, Some(&Value::Int(1))),
            std::cmp::Ordering::Greater
        );
        let selection_first = OrderSelection::new(Term::Const(Value::Null), true, false);
        assert_eq!(
            selection_first.compare_values(None, Some(&Value::Int(1))),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn descending_order_reverses_comparison() {
        let selection = OrderSelection::new(Term::Const(Value::Null), false, true);
        assert_eq!(
            selection.compare_values(Some(&Value::Int(1)), Some(&Value::Int(2))),
            std::cmp::Ordering::Greater
        );
    }

    #[test]
    fn lexicographic_ordering_breaks_ties_with_second_selection() {
        let first = OrderSelection::new(Term::Const(Value::Null), true, true);
        let second = OrderSelection::new(Term::Const(Value::Null), true, true);
        let rows = vec![
            (first, Some(Value::Int(1)), Some(Value::Int(1))),
            (second, Some(Value::Int(2)), Some(Value::Int(1))),
        ];
        assert_eq!(compare_rows(&rows), std::cmp::Ordering::Greater);
    }
}
