//! `FilterOrderByOffsetLimit` extractor/constructor (spec §4.E): recognizes
//! and rebuilds the canonical stack `Limit(Offset(OrderBy(Filter(…, c))))`,
//! with any subset of the four layers optional, preserving that nesting
//! order on construction.

use crate::query::Query;
use crate::term::{OrderSelection, Predicate};

/// The canonically-ordered `Limit`/`Offset`/`OrderBy`/`Filter` prefix of a
/// query, each optional, plus whatever remains underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderByOffsetLimit {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<Vec<OrderSelection>>,
    pub filter: Option<Predicate>,
    pub base: Query,
}

/// Peels at most one layer of each kind, outermost first
/// (`Limit > Offset > OrderBy > Filter`); anything left over — including a
/// second layer of one of these kinds — is returned as `base` untouched.
pub fn extract_filter_stack(q: &Query) -> FilterOrderByOffsetLimit {
    let mut limit = None;
    let mut offset = None;
    let mut order_by = None;
    let mut filter = None;
    let mut cur = q;

    if let Query::Limit { n, child } = cur {
        limit = Some(*n);
        cur = child;
    }
    if let Query::Offset { n, child } = cur {
        offset = Some(*n);
        cur = child;
    }
    if let Query::OrderBy { selections, child } = cur {
        order_by = Some(selections.clone());
        cur = child;
    }
    if let Query::Filter(pred, child) = cur {
        filter = Some(pred.clone());
        cur = child;
    }

    FilterOrderByOffsetLimit {
        limit,
        offset,
        order_by,
        filter,
        base: cur.clone(),
    }
}

impl FilterOrderByOffsetLimit {
    /// Rebuilds `Limit(Offset(OrderBy(Filter(base))))` from whichever layers
    /// are present.
    pub fn build(self) -> Query {
        let mut q = self.base;
        if let Some(pred) = self.filter {
            q = Query::filter(pred, q);
        }
        if let Some(selections) = self.order_by {
            q = Query::order_by(selections, q);
        }
        if let Some(n) = self.offset {
            q = Query::offset(n, q);
        }
        if let Some(n) = self.limit {
            q = Query::limit(n, q);
        }
        q
    }
}
