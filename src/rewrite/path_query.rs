//! `mkPathQuery` (spec §4.E): given a list of field-name paths, constructs
//! the minimal query selecting all of them, sharing common prefixes.
//! Duplicate one-element paths collapse into a single leaf selection.

use crate::query::Query;

/// Builds a prefix-sharing selection tree from `paths` (each an ordered list
/// of field names from the root). Paths with a common head share a single
/// `Select` node; a path that terminates exactly at a node contributes no
/// subselection there, letting sibling longer paths still expand under it.
pub fn mk_path_query(paths: &[Vec<String>]) -> Query {
    let mut buckets: Vec<(String, Vec<Vec<String>>)> = Vec::new();

    for path in paths {
        let (head, rest) = match path.split_first() {
            Some((head, rest)) => (head.clone(), rest.to_vec()),
            None => continue,
        };
        match buckets.iter_mut().find(|(h, _)| *h == head) {
            Some((_, rests)) => rests.push(rest),
            None => buckets.push((head, vec![rest])),
        }
    }

    let selects: Vec<Query> = buckets
        .into_iter()
        .map(|(head, rests)| {
            let non_terminal: Vec<Vec<String>> =
                rests.into_iter().filter(|r| !r.is_empty()).collect();
            let child = if non_terminal.is_empty() {
                Query::Empty
            } else {
                mk_path_query(&non_terminal)
            };
            Query::select(head, Vec::new(), child)
        })
        .collect();

    match selects.len() {
        0 => Query::Empty,
        1 => selects.into_iter().next().expect("len checked above"),
        _ => Query::Group(selects),
    }
}

fn path(segments: &[&str]) -> Vec<String> {
    segments.iter().map(|s| s.to_string()).collect()
}
