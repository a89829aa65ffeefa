//! 쿼리 옵티마이저: greedy left-deep join planning
//!
//! Rebuilds a naively shaped plan (scans under products, selects and projects
//! on top) into a left-deep join chain:
//!
//! 1. **Classify**: bucket every Project, Select and Scan of the input
//! 2. **Order**: greedy scan order driven by the catalog's static row counts
//! 3. **Unary plans**: push value filters and narrowing projections onto each scan
//! 4. **Assemble**: fold the unary plans into `Join(Join(u0, u1), u2)...`
//!
//! The input plan and the catalog are never modified.

mod assemble;
mod classify;
mod ordering;


use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::catalog::Catalog;
use crate::error::PlanxResult;
use crate::plan::{LogicalPlan, Predicate};

use assemble::Requirements;
use classify::BaseScan;

/// Optimizer switches. Both pushdowns are on by default.
///
/// # Example
///
/// ```rust
/// use planx_core::OptimizerConfig;
///
/// let config = OptimizerConfig::default().with_projection_pushdown(false);
/// assert!(config.filter_pushdown);
/// assert!(!config.projection_pushdown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Place value filters directly above their scan instead of above the join chain.
    pub filter_pushdown: bool,
    /// Narrow each scan to the columns needed by later joins and the final output.
    pub projection_pushdown: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            filter_pushdown: true,
            projection_pushdown: true,
        }
    }
}

impl OptimizerConfig {
    pub fn with_filter_pushdown(mut self, enabled: bool) -> Self {
        self.filter_pushdown = enabled;
        self
    }

    pub fn with_projection_pushdown(mut self, enabled: bool) -> Self {
        self.projection_pushdown = enabled;
        self
    }
}

/// 쿼리 옵티마이저
#[derive(Debug, Clone, Default)]
pub struct QueryOptimizer {
    config: OptimizerConfig,
}

impl QueryOptimizer {
    /// 기본 설정으로 생성
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Build a left-deep equivalent of `plan`.
    ///
    /// Fails with `UnknownRelation` when a scan is missing from `catalog`,
    /// `AttributeNotFound` when a predicate or projection names a column no
    /// scan provides, and `DisconnectedPlan` when the join predicates do not
    /// connect every scan.
    #[instrument(skip_all, fields(tables = plan.tables().len()))]
    pub fn optimize(&self, plan: &LogicalPlan, catalog: &Catalog) -> PlanxResult<LogicalPlan> {
        let classified = classify::classify(plan);
        let scans = classify::resolve_scans(&classified.scans, catalog)?;
        classify::check_references(&classified, &scans)?;
        debug!(
            target: "optimizer",
            scans = scans.len(),
            value_filters = classified.value_filters.len(),
            join_candidates = classified.join_candidates.len(),
            target = classified.target.len(),
            "classified"
        );

        let (local_filters, edges): (Vec<Predicate>, Vec<Predicate>) = classified
            .join_candidates
            .iter()
            .cloned()
            .partition(|p| is_local(p, &scans));

        let order = ordering::plan_join_order(scans, &classified.value_filters, edges)?;
        let tables: Vec<&str> = order.scans.iter().map(|s| s.table.as_str()).collect();
        debug!(
            target: "optimizer",
            order = %tables.join(", "),
            residual = order.residual.len(),
            "join order"
        );

        let requirements = Requirements {
            config: &self.config,
            target: &classified.target,
            value_filters: &classified.value_filters,
            local_filters: &local_filters,
            join_candidates: &classified.join_candidates,
        };
        let optimized = assemble::assemble(&order, &requirements)?;
        debug!(target: "optimizer", plan = %optimized, "optimized");
        Ok(optimized)
    }
}

/// Both endpoints in the same scan.
fn is_local(predicate: &Predicate, scans: &[BaseScan]) -> bool {
    scans
        .iter()
        .any(|s| predicate.attributes().all(|a| s.owns(a)))
}
