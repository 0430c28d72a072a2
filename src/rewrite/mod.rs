//! # Plan Rewriting Utilities
//!
//! Structural helpers over [`Query`] trees (spec §4.E): flattening
//! (`ungroup`), transparent descent through `Rename`/`Environment`/
//! `TransformCursor` (`children`, `has_field`, `field_alias`, `root_name`,
//! `rename_root`), a structure-preserving map over top-level selections
//! (`map_fields`), and the heavier extractors/constructors that live in
//! their own submodules (`merge`, `path_query`, `type_case`, `filter_stack`).

pub mod filter_stack;
pub mod merge;
pub mod path_query;
pub mod type_case;

pub use merge::merge_queries;
pub use path_query::mk_path_query;
pub use type_case::{build_type_case, type_case};

use crate::query::Query;
use crate::result::Outcome;

/// Flattens the top-level `Group` transitively; returns the flat list of
/// non-`Group` children (spec §4.E `ungroup`).
pub fn ungroup(q: &Query) -> Vec<Query> {
    match q {
        Query::Group(children) => children.iter().flat_map(ungroup).collect(),
        other => vec![other.clone()],
    }
}

/// Peels `Rename`/`Environment`/`TransformCursor` wrappers, returning the
/// innermost node and the outermost `Rename` name encountered on the way
/// down, if any.
fn peel_transparent(q: &Query) -> (&Query, Option<String>) {
    match q {
        Query::Rename { name, child } => {
            let (inner, _) = peel_transparent(child);
            (inner, Some(name.clone()))
        }
        Query::Environment { child, .. } => peel_transparent(child),
        Query::TransformCursor { child, .. } => peel_transparent(child),
        other => (other, None),
    }
}

fn selection_name(core: &Query) -> Option<&str> {
    match core {
        Query::Select { name, .. } | Query::Wrap { name, .. } | Query::Count { name, .. } => {
            Some(name)
        }
        _ => None,
    }
}

/// Descends through `Rename`/`Environment`/`TransformCursor` and returns the
/// ungrouped children of the underlying `Select`/`Wrap`/`Count`; `[]` for
/// other node kinds (spec §4.E `children`).
pub fn children(q: &Query) -> Vec<Query> {
    let (core, _) = peel_transparent(q);
    match core {
        Query::Select { child, .. } | Query::Wrap { child, .. } | Query::Count { child, .. } => {
            ungroup(child)
        }
        _ => Vec::new(),
    }
}

/// Recognizes a top-level selection of `f`, transparently to
/// `Rename`/`Environment`/`TransformCursor` (spec §4.E `hasField`). `Group`s
/// are searched branch by branch.
pub fn has_field(q: &Query, f: &str) -> bool {
    match q {
        Query::Group(branches) => branches.iter().any(|b| has_field(b, f)),
        other => {
            let (core, _) = peel_transparent(other);
            selection_name(core) == Some(f)
        }
    }
}

/// Returns the outermost `Rename` name encountered on the way to a selection
/// of `f`, or `None` (spec §4.E `fieldAlias`, property P7).
pub fn field_alias(q: &Query, f: &str) -> Option<String> {
    match q {
        Query::Group(branches) => branches.iter().find_map(|b| field_alias(b, f)),
        other => {
            let (core, alias) = peel_transparent(other);
            if selection_name(core) == Some(f) {
                alias
            } else {
                None
            }
        }
    }
}

/// `(name, alias?)` if `q` has a unique root selection; `None` otherwise
/// (spec §4.E `rootName`).
pub fn root_name(q: &Query) -> Option<(String, Option<String>)> {
    let target = match q {
        Query::Group(branches) if branches.len() == 1 => &branches[0],
        Query::Group(_) => return None,
        other => other,
    };
    let (core, alias) = peel_transparent(target);
    selection_name(core).map(|name| (name.to_string(), alias))
}

/// `q` with its root selection aliased to `n`; `None` if `q` lacks a unique
/// root (spec §4.E `renameRoot`).
pub fn rename_root(q: &Query, n: &str) -> Option<Query> {
    root_name(q)?;
    Some(rename_root_in(q, n))
}

fn rename_root_in(q: &Query, n: &str) -> Query {
    match q {
        Query::Group(branches) if branches.len() == 1 => {
            Query::Group(vec![rename_root_in(&branches[0], n)])
        }
        Query::Rename { child, .. } => Query::rename(n, (**child).clone()),
        Query::Environment { env, child } => Query::Environment {
            env: env.clone(),
            child: Box::new(rename_root_in(child, n)),
        },
        Query::TransformCursor { transform, child } => Query::TransformCursor {
            transform: transform.clone(),
            child: Box::new(rename_root_in(child, n)),
        },
        other => Query::rename(n, other.clone()),
    }
}

fn map_fields_branch(
    branch: &Query,
    f: &mut impl FnMut(&Query) -> Outcome<Query>,
) -> Outcome<Query> {
    match branch {
        Query::Rename { name, child } => {
            map_fields_branch(child, f).map(|c| Query::rename(name.clone(), c))
        }
        Query::Environment { env, child } => map_fields_branch(child, f).map(|c| Query::Environment {
            env: env.clone(),
            child: Box::new(c),
        }),
        Query::TransformCursor { transform, child } => {
            map_fields_branch(child, f).map(|c| Query::TransformCursor {
                transform: transform.clone(),
                child: Box::new(c),
            })
        }
        Query::Select { .. } | Query::Wrap { .. } | Query::Count { .. } => f(branch),
        other => Outcome::Success(other.clone()),
    }
}

/// Applies `f` to every top-level selection node (`Select`/`Wrap`/`Count`)
/// in order, rebuilding the tree and propagating failures from the
/// accumulating carrier (spec §4.E `mapFields`). Non-selection branches pass
/// through unchanged.
pub fn map_fields(q: &Query, mut f: impl FnMut(&Query) -> Outcome<Query>) -> Outcome<Query> {
    match q {
        Query::Group(branches) => {
            Outcome::<()>::traverse(branches.iter(), |b| map_fields_branch(b, &mut f))
                .map(Query::Group)
        }
        other => map_fields_branch(other, &mut f),
    }
}
