//! `TypeCase` extractor (spec §4.E, used by phase 4 type-refinement
//! normalization and interface/union field elaboration): partitions a
//! (possibly `Group`-ed) set of children into the non-`Narrow` "default"
//! selections and the `Narrow` branches, grouped and merged by subtype.

use super::{merge_queries, ungroup};
use crate::query::Query;
use crate::result::Outcome;
use crate::schema::TypeRef;

/// `(default, narrows)`: `default` is every non-`Narrow` child in source
/// order; `narrows` has at most one entry per distinct subtype, its body the
/// merge of every `Narrow` body declared against that subtype. `None` if `q`
/// contains no `Narrow` children at all.
pub fn type_case(q: &Query) -> Option<(Vec<Query>, Vec<(TypeRef, Query)>)> {
    let mut default = Vec::new();
    let mut buckets: Vec<(TypeRef, Vec<Query>)> = Vec::new();

    for item in ungroup(q) {
        match item {
            Query::Narrow { subtype, child } => match buckets.iter_mut().find(|(t, _)| *t == subtype) {
                Some((_, bodies)) => bodies.push(*child),
                None => buckets.push((subtype, vec![*child])),
            },
            other => default.push(other),
        }
    }

    if buckets.is_empty() {
        return None;
    }

    let narrows = buckets
        .into_iter()
        .map(|(subtype, bodies)| (subtype, merge_bodies(bodies)))
        .collect();
    Some((default, narrows))
}

fn merge_bodies(bodies: Vec<Query>) -> Query {
    match merge_queries(&bodies) {
        Outcome::Success(q) | Outcome::Warning(_, q) => q,
        Outcome::Failure(_) => Query::Group(bodies),
    }
}

/// Inverse of [`type_case`]: rebuilds `Group(default ++ narrows.map(Narrow))`,
/// collapsing to a single element or `Empty` the same way `mergeQueries` does.
pub fn build_type_case(default: Vec<Query>, narrows: Vec<(TypeRef, Query)>) -> Query {
    let mut items = default;
    items.extend(narrows.into_iter().map(|(subtype, body)| Query::narrow(subtype, body)));
    match items.len() {
        0 => Query::Empty,
        1 => items.into_iter().next().expect("len checked above"),
        _ => Query::Group(items),
    }
}
