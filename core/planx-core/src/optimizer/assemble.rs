//! Phases 3-4: per-relation unary plans and the left-deep join chain

use tracing::debug;

use super::OptimizerConfig;
use super::classify::BaseScan;
use super::ordering::JoinOrder;
use crate::error::{PlanxError, PlanxResult};
use crate::plan::{Attribute, LogicalPlan, Predicate};

/// Everything the unary builders need besides the scan itself.
pub(super) struct Requirements<'a> {
    pub config: &'a OptimizerConfig,
    pub target: &'a [Attribute],
    pub value_filters: &'a [Predicate],
    /// Attribute comparisons within a single scan
    pub local_filters: &'a [Predicate],
    /// Every attribute comparison of the input plan
    pub join_candidates: &'a [Predicate],
}

impl Requirements<'_> {
    fn filters(&self) -> impl Iterator<Item = &Predicate> {
        self.value_filters.iter().chain(self.local_filters)
    }

    /// Columns of `scan` still needed above it, join columns first.
    fn needed_columns(&self, scan: &BaseScan) -> Vec<Attribute> {
        let mut referenced: Vec<&Attribute> = self
            .join_candidates
            .iter()
            .flat_map(Predicate::attributes)
            .collect();
        if !self.config.filter_pushdown {
            referenced.extend(self.value_filters.iter().map(Predicate::left));
        }
        referenced.extend(self.target);

        let mut columns: Vec<Attribute> = Vec::new();
        for attr in referenced {
            if let Some(own) = scan.relation.attribute(attr.name()) {
                if !columns.contains(own) {
                    columns.push(own.clone());
                }
            }
        }
        columns
    }
}

/// Scan, then pushed filters, then the narrowing projection.
pub(super) fn unary_plan(scan: &BaseScan, req: &Requirements<'_>) -> LogicalPlan {
    let mut plan = LogicalPlan::scan_relation(scan.table.clone(), scan.relation.clone());

    if req.config.filter_pushdown {
        for filter in req.filters().filter(|f| scan.owns(f.left())) {
            plan = LogicalPlan::select(plan, filter.clone());
        }
    }

    if !req.target.is_empty() && req.config.projection_pushdown {
        let columns = req.needed_columns(scan);
        if !columns.is_empty() {
            plan = LogicalPlan::project(plan, columns);
        }
    }
    plan
}

/// Fold the unary plans into `Join(Join(u0, u1), u2)...`.
///
/// Residual edges become a Select right above the first Join that sees both
/// endpoints.
pub(super) fn assemble(order: &JoinOrder, req: &Requirements<'_>) -> PlanxResult<LogicalPlan> {
    if let Some(orphan) = req
        .filters()
        .find(|f| !order.scans.iter().any(|s| s.owns(f.left())))
    {
        return Err(PlanxError::attribute_not_found(
            orphan.left().name(),
            format!("SELECT [{}]", orphan),
        ));
    }

    let mut scans = order.scans.iter();
    let first = scans.next().ok_or(PlanxError::EmptyPlan)?;
    let mut chain = unary_plan(first, req);
    let mut available: Vec<&BaseScan> = vec![first];
    let mut pending: Vec<&Predicate> = order.residual.iter().collect();

    for (scan, predicate) in scans.zip(&order.joins) {
        chain = LogicalPlan::join(chain, unary_plan(scan, req), predicate.clone());
        available.push(scan);

        let (ready, rest): (Vec<&Predicate>, Vec<&Predicate>) = pending
            .into_iter()
            .partition(|p| p.attributes().all(|a| available.iter().any(|s| s.owns(a))));
        for residual in ready {
            debug!(target: "optimizer", predicate = %residual, "residual join predicate");
            chain = LogicalPlan::select(chain, residual.clone());
        }
        pending = rest;
    }

    if let Some(stranded) = pending.first() {
        let missing = stranded
            .attributes()
            .find(|a| !available.iter().any(|s| s.owns(a)))
            .unwrap_or(stranded.left());
        return Err(PlanxError::attribute_not_found(
            missing.name(),
            format!("JOIN [{}]", stranded),
        ));
    }

    if !req.config.filter_pushdown {
        for filter in req.filters() {
            chain = LogicalPlan::select(chain, filter.clone());
        }
    }

    let target_names: Vec<&str> = req.target.iter().map(Attribute::name).collect();
    let wrap = !req.target.is_empty()
        && (order.scans.len() > 1 || chain.column_names() != target_names);
    if wrap {
        chain = LogicalPlan::project(chain, req.target.to_vec());
    }
    Ok(chain)
}
