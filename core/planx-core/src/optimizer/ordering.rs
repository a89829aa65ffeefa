//! Phase 2: greedy scan order and matching join order
//!
//! Ordering uses the catalog's static row counts only. A selective filter on a
//! large relation does not move that relation forward; this is a known
//! limitation of the heuristic.

use tracing::debug;

use super::classify::BaseScan;
use crate::error::{PlanxError, PlanxResult};
use crate::plan::{Attribute, Predicate};

/// Scans in join order; `joins[i]` connects `scans[i + 1]` to the chain.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct JoinOrder {
    pub scans: Vec<BaseScan>,
    pub joins: Vec<Predicate>,
    /// Edges not used to connect a scan (cycles, parallel edges).
    pub residual: Vec<Predicate>,
}

/// Sort key: filtered scans first, each group by ascending base row count.
fn rank_key(scan: &BaseScan, value_filters: &[Predicate]) -> (bool, u64) {
    (!scan.is_filtered(value_filters), scan.row_count())
}

/// Stable sort by [`rank_key`].
pub(super) fn rank(scans: &mut [BaseScan], value_filters: &[Predicate]) {
    scans.sort_by_key(|s| rank_key(s, value_filters));
}

/// Build the left-deep order over `scans` connected by `edges`.
///
/// `edges` must only hold predicates whose endpoints belong to two different scans.
pub(super) fn plan_join_order(
    mut scans: Vec<BaseScan>,
    value_filters: &[Predicate],
    edges: Vec<Predicate>,
) -> PlanxResult<JoinOrder> {
    rank(&mut scans, value_filters);
    let mut remaining_scans = scans.into_iter();
    let root = remaining_scans.next().ok_or(PlanxError::EmptyPlan)?;
    debug!(target: "optimizer", root = %root.table, rows = root.row_count(), "root scan");

    // a scan sharing columns with a placed one is the same relation scanned twice
    let mut pool: Vec<BaseScan> = remaining_scans
        .filter(|s| !s.relation.shares_attribute_with(&root.relation))
        .collect();
    let mut placed = vec![root];
    let mut joins = Vec::new();
    let mut remaining = edges;
    let mut frontier = 0;

    while !pool.is_empty() {
        let mut step = expand(&placed[frontier..=frontier], &pool, &remaining);
        if step.is_empty() {
            step = expand(&placed, &pool, &remaining);
        }
        if step.is_empty() {
            return Err(PlanxError::DisconnectedPlan {
                unreachable: pool.into_iter().map(|s| s.table).collect(),
            });
        }

        let mut reached: Vec<(BaseScan, Predicate)> = step
            .iter()
            .map(|(idx, predicate)| (pool[*idx].clone(), predicate.clone()))
            .collect();
        reached.sort_by_key(|(s, _)| rank_key(s, value_filters));

        remaining = remaining
            .into_iter()
            .filter(|p| !reached.iter().any(|(_, used)| used == p))
            .collect();
        pool = pool
            .into_iter()
            .enumerate()
            .filter(|(idx, scan)| {
                !step.iter().any(|(taken, _)| taken == idx)
                    && !reached
                        .iter()
                        .any(|(r, _)| scan.relation.shares_attribute_with(&r.relation))
            })
            .map(|(_, scan)| scan)
            .collect();

        frontier = placed.len();
        for (scan, predicate) in reached {
            debug!(target: "optimizer", scan = %scan.table, join = %predicate, "placed");
            placed.push(scan);
            joins.push(predicate);
        }
    }

    Ok(JoinOrder {
        scans: placed,
        joins,
        residual: remaining,
    })
}

/// Pool scans reachable from `frontier` through one edge, first edge wins.
fn expand(
    frontier: &[BaseScan],
    pool: &[BaseScan],
    edges: &[Predicate],
) -> Vec<(usize, Predicate)> {
    let in_frontier = |attr: &Attribute| frontier.iter().any(|s| s.owns(attr));
    let owner = |attr: &Attribute| pool.iter().position(|s| s.owns(attr));

    let mut step: Vec<(usize, Predicate)> = Vec::new();
    for edge in edges {
        let Some(right) = edge.right_attribute() else {
            continue;
        };
        let left = edge.left();
        let target = if in_frontier(left) {
            owner(right)
        } else if in_frontier(right) {
            owner(left)
        } else {
            None
        };
        if let Some(idx) = target {
            if !step.iter().any(|(taken, _)| *taken == idx) {
                step.push((idx, edge.clone()));
            }
        }
    }
    step
}
