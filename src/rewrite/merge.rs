//! `mergeQueries` (spec §4.E) — flattens a list of plan trees, combines
//! selections that share `(fieldName, resultName)`, and recursively merges
//! their children.
//!
//! ## Open Question: conflicting arguments within a merge bucket
//!
//! Spec §4.E's worked examples only ever merge selections whose arguments
//! already agree (typically both empty) — the elaborator's alias-assignment
//! phase is what prevents same-field/different-argument duplicates from ever
//! reaching `mergeQueries` unaliased in practice. The one place the spec body
//! is explicit is the open question this module resolves: rather than pick
//! one side's arguments silently, a same-`(fieldName, resultName)` bucket
//! whose members disagree on arguments is reported as
//! [`crate::error::CompileError::AmbiguousMerge`]. Per the phase model (spec
//! §7: "phases 2-8 accumulate"), this is a `Warning`, not a `Failure`: the
//! conflicting selections are left unmerged, side by side, in the output
//! tree, and the problem is accumulated for the caller to surface.
//!
//! A merged bucket's rebuilt selection always carries empty args (spec
//! §4.E step 4: "a single selection with empty args and merged child") —
//! uniformity across the bucket is what licenses the merge in the first
//! place, so the shared argument list carries no information the merged
//! node still needs to keep.

use super::ungroup;
use crate::query::Query;
use crate::result::{Outcome, Problem};
use crate::value::Binding;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Shape {
    Select,
    Wrap,
    Count,
}

struct SelItem {
    alias: Option<String>,
    field_name: String,
    shape: Shape,
    args: Vec<Binding>,
    child: Query,
    original: Query,
}

/// `PossiblyRenamedSelect` extractor (spec §4.E): recognizes a bare or
/// singly-`Rename`-wrapped `Select`/`Wrap`/`Count`. Per the open question
/// above, a `Rename` wrapping anything other than a selection (e.g. an
/// `Environment`/`TransformCursor` boundary) is deliberately *not*
/// recognized — those nodes are a merge barrier, not a selection.
fn possibly_renamed_select(q: &Query) -> Option<SelItem> {
    let (alias, core) = match q {
        Query::Rename { name, child } => (Some(name.clone()), child.as_ref()),
        Query::Select { .. } | Query::Wrap { .. } | Query::Count { .. } => (None, q),
        _ => return None,
    };
    let (field_name, shape, args, child) = match core {
        Query::Select { name, args, child } => {
            (name.clone(), Shape::Select, args.clone(), (**child).clone())
        }
        Query::Wrap { name, child } => (name.clone(), Shape::Wrap, Vec::new(), (**child).clone()),
        Query::Count { name, child } => {
            (name.clone(), Shape::Count, Vec::new(), (**child).clone())
        }
        _ => return None,
    };
    Some(SelItem {
        alias,
        field_name,
        shape,
        args,
        child,
        original: q.clone(),
    })
}

fn args_equal(a: &[Binding], b: &[Binding]) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|x| b.iter().any(|y| y.name == x.name && y.value == x.value))
}

fn rebuild(shape: Shape, field_name: &str, alias: Option<&str>, args: Vec<Binding>, child: Query) -> Query {
    let core = match shape {
        Shape::Select => Query::select(field_name, args, child),
        Shape::Wrap => Query::wrap(field_name, child),
        Shape::Count => Query::count(field_name, child),
    };
    match alias {
        Some(name) => Query::rename(name, core),
        None => core,
    }
}

/// Flattens `qs`, merges selections sharing `(fieldName, resultName)`, and
/// recursively merges their children. Collapses to a single element if the
/// result has one, to `Empty` if it has none (spec §4.E, property P2/P4).
pub fn merge_queries(qs: &[Query]) -> Outcome<Query> {
    let flat: Vec<Query> = qs
        .iter()
        .flat_map(ungroup)
        .filter(|q| !q.is_empty_node())
        .collect();

    let mut rest: Vec<Query> = Vec::new();
    // (field_name, result_name) -> bucket, insertion-ordered for determinism.
    let mut buckets: Vec<((String, String), Vec<SelItem>)> = Vec::new();

    for item in flat {
        match possibly_renamed_select(&item) {
            Some(sel) => {
                let result_name = sel.alias.clone().unwrap_or_else(|| sel.field_name.clone());
                let key = (sel.field_name.clone(), result_name);
                match buckets.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, bucket)) => bucket.push(sel),
                    None => buckets.push((key, vec![sel])),
                }
            }
            None => rest.push(item),
        }
    }

    let mut problems = Vec::new();
    let mut merged = Vec::new();

    for (_, bucket) in buckets {
        let shape = bucket[0].shape;
        let homogeneous_shape = bucket.iter().all(|i| i.shape == shape);
        let first_args = &bucket[0].args;
        let uniform_args = bucket.iter().all(|i| args_equal(&i.args, first_args));

        if !homogeneous_shape || !uniform_args {
            let field = bucket[0].field_name.clone();
            let alias = bucket[0]
                .alias
                .clone()
                .unwrap_or_else(|| bucket[0].field_name.clone());
            log::warn!("ambiguous merge on field '{field}' (alias '{alias}'): shapes or arguments disagree");
            problems.push(Problem::new(crate::error::CompileError::AmbiguousMerge {
                field,
                alias,
            }));
            rest.extend(bucket.into_iter().map(|i| i.original));
            continue;
        }

        let alias = bucket[0].alias.clone();
        let field_name = bucket[0].field_name.clone();
        let children: Vec<Query> = bucket.into_iter().map(|i| i.child).collect();

        match merge_queries(&children) {
            Outcome::Success(merged_child) => {
                merged.push(rebuild(shape, &field_name, alias.as_deref(), Vec::new(), merged_child));
            }
            Outcome::Warning(more, merged_child) => {
                problems.extend(more);
                merged.push(rebuild(shape, &field_name, alias.as_deref(), Vec::new(), merged_child));
            }
            Outcome::Failure(more) => {
                problems.extend(more);
            }
        }
    }

    let mut out: Vec<Query> = rest;
    out.extend(merged);

    let tree = match out.len() {
        0 => Query::Empty,
        1 => out.into_iter().next().expect("len checked above"),
        _ => Query::Group(out),
    };

    if problems.is_empty() {
        Outcome::Success(tree)
    } else {
        Outcome::Warning(problems, tree)
    }
}
