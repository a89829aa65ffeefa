//! Phase 1: Classify
//!
//! 입력 플랜을 전위 순회하며 연산자를 분류합니다. Select/Product shape is
//! discarded; only the predicates, scans and requested columns survive.

use ahash::AHashSet;

use crate::catalog::Catalog;
use crate::error::{PlanxError, PlanxResult};
use crate::plan::{Attribute, LogicalPlan, PlanNode, Predicate, Relation};

/// A scan of the input plan, with statistics taken from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct BaseScan {
    pub table: String,
    pub relation: Relation,
}

impl BaseScan {
    pub fn row_count(&self) -> u64 {
        self.relation.row_count()
    }

    pub fn owns(&self, attribute: &Attribute) -> bool {
        self.relation.contains(attribute.name())
    }

    /// True when some value filter applies to this scan.
    pub fn is_filtered(&self, value_filters: &[Predicate]) -> bool {
        value_filters.iter().any(|f| self.owns(f.left()))
    }
}

/// Operators bucketed by role.
#[derive(Debug, Default)]
pub(super) struct Classified {
    /// Union of every Project's columns; empty when the plan has no Project.
    pub target: Vec<Attribute>,
    /// `attr = literal`
    pub value_filters: Vec<Predicate>,
    /// `attr = attr`
    pub join_candidates: Vec<Predicate>,
    /// Base relation names, in plan order.
    pub scans: Vec<String>,
}

pub(super) fn classify(plan: &LogicalPlan) -> Classified {
    let mut out = Classified::default();
    walk(plan, &mut out);
    out
}

fn walk(plan: &LogicalPlan, out: &mut Classified) {
    match plan.node() {
        PlanNode::Scan { table, .. } => out.scans.push(table.clone()),
        PlanNode::Project { attributes, .. } => {
            for attr in attributes {
                if !out.target.contains(attr) {
                    out.target.push(attr.clone());
                }
            }
        }
        PlanNode::Select { predicate, .. } | PlanNode::Join { predicate, .. } => {
            if predicate.is_literal() {
                out.value_filters.push(predicate.clone());
            } else {
                out.join_candidates.push(predicate.clone());
            }
        }
        PlanNode::Product { .. } => {}
    }
    for input in plan.inputs() {
        walk(input, out);
    }
}

/// Look up each scan's static statistics in the catalog.
pub(super) fn resolve_scans(
    scans: &[String],
    catalog: &Catalog,
) -> PlanxResult<Vec<BaseScan>> {
    scans
        .iter()
        .map(|table| {
            Ok(BaseScan {
                table: table.clone(),
                relation: catalog.get_relation(table)?.clone(),
            })
        })
        .collect()
}

/// Every referenced column must belong to some scan.
pub(super) fn check_references(classified: &Classified, scans: &[BaseScan]) -> PlanxResult<()> {
    let columns: AHashSet<&str> = scans
        .iter()
        .flat_map(|s| s.relation.attributes())
        .map(Attribute::name)
        .collect();
    let owned = |attr: &Attribute| columns.contains(attr.name());

    for predicate in classified
        .value_filters
        .iter()
        .chain(&classified.join_candidates)
    {
        if let Some(missing) = predicate.attributes().find(|a| !owned(a)) {
            return Err(PlanxError::attribute_not_found(
                missing.name(),
                format!("SELECT [{}]", predicate),
            ));
        }
    }
    if let Some(missing) = classified.target.iter().find(|a| !owned(a)) {
        let names: Vec<&str> = classified.target.iter().map(Attribute::name).collect();
        return Err(PlanxError::attribute_not_found(
            missing.name(),
            format!("PROJECT [{}]", names.join(",")),
        ));
    }
    Ok(())
}
