//! 카디널리티 추정기: bottom-up selectivity propagation
//!
//! Annotates every node of a plan with its estimated output [`Relation`].
//! Children are visited before their parent, left before right. All
//! arithmetic is floor division; an estimate may legally reach 0.
//!
//! | Operator | Rows | Attributes |
//! |---|---|---|
//! | Scan | base rows | base attributes |
//! | Project | input rows | requested attributes, resolved against input |
//! | Select `a = c` | rows / V(a) | `a` becomes 1 |
//! | Select `a = b` | rows / max(V(a), V(b)) | `a`, `b` become min(V(a), V(b)) |
//! | Product | left × right | left ++ right |
//! | Join `a = b` | left × right / max(V(a), V(b)) | left ++ right, `a`, `b` become min |

#[cfg(test)]
mod tests;

use tracing::trace;

use crate::error::{PlanxError, PlanxResult};
use crate::plan::{Attribute, LogicalPlan, Operand, PlanNode, Predicate, Relation};

/// Stateless estimator; reusable across plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator;

impl Estimator {
    pub fn new() -> Self {
        Self
    }

    /// Annotate every node of `plan`, overwriting earlier annotations.
    ///
    /// On error the tree may be partially annotated and should not be inspected.
    pub fn estimate(&self, plan: &mut LogicalPlan) -> PlanxResult<()> {
        self.visit(plan).map(|_| ())
    }

    fn visit(&self, plan: &mut LogicalPlan) -> PlanxResult<Relation> {
        let output = match plan.node_mut() {
            PlanNode::Scan { relation, .. } => relation.clone(),
            PlanNode::Project { input, attributes } => {
                let attributes: &[Attribute] = attributes;
                let input = self.visit(input)?;
                let mut resolved = Vec::with_capacity(attributes.len());
                for attr in attributes {
                    let found = lookup(&input, attr.name(), || {
                        format!("PROJECT [{}]", names(attributes))
                    })?;
                    resolved.push(found.clone());
                }
                Relation::with_attributes(input.row_count(), resolved)
            }
            PlanNode::Select { input, predicate } => {
                let input = self.visit(input)?;
                select(&input, predicate)?
            }
            PlanNode::Product { left, right } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                let rows = left.row_count().saturating_mul(right.row_count());
                Relation::with_attributes(rows, concat(&left, &right))
            }
            PlanNode::Join {
                left,
                right,
                predicate,
            } => {
                let left = self.visit(left)?;
                let right = self.visit(right)?;
                join(&left, &right, predicate)?
            }
        };

        trace!(
            target: "estimator",
            node = %plan.label(),
            rows = output.row_count(),
            "estimated"
        );
        plan.set_output(output.clone());
        Ok(output)
    }
}

fn select(input: &Relation, predicate: &Predicate) -> PlanxResult<Relation> {
    let context = || format!("SELECT [{}]", predicate);
    let left = lookup(input, predicate.left().name(), context)?;

    match predicate.right() {
        Operand::Value(_) => {
            let rows = floor_div(u128::from(input.row_count()), left.distinct_values());
            let attributes = with_estimate(input.attributes(), &[left.name()], 1);
            Ok(Relation::with_attributes(rows, attributes))
        }
        Operand::Attribute(right) => {
            let right = lookup(input, right.name(), context)?;
            let (lv, rv) = (left.distinct_values(), right.distinct_values());
            let rows = floor_div(u128::from(input.row_count()), lv.max(rv));
            let attributes =
                with_estimate(input.attributes(), &[left.name(), right.name()], lv.min(rv));
            Ok(Relation::with_attributes(rows, attributes))
        }
    }
}

fn join(left: &Relation, right: &Relation, predicate: &Predicate) -> PlanxResult<Relation> {
    let combined = Relation::with_attributes(0, concat(left, right));
    let context = || format!("JOIN [{}]", predicate);

    let a = lookup(&combined, predicate.left().name(), context)?;
    let b = match predicate.right() {
        Operand::Attribute(attr) => lookup(&combined, attr.name(), context)?,
        // a literal join degenerates to the literal select rule over the product
        Operand::Value(_) => a,
    };
    let (av, bv) = (a.distinct_values(), b.distinct_values());
    let product = u128::from(left.row_count()) * u128::from(right.row_count());
    let rows = floor_div(product, av.max(bv));
    let estimate = if predicate.is_literal() { 1 } else { av.min(bv) };
    let attributes = with_estimate(combined.attributes(), &[a.name(), b.name()], estimate);
    Ok(Relation::with_attributes(rows, attributes))
}

fn lookup<'a>(
    relation: &'a Relation,
    name: &str,
    context: impl FnOnce() -> String,
) -> PlanxResult<&'a Attribute> {
    relation
        .attribute(name)
        .ok_or_else(|| PlanxError::attribute_not_found(name, context()))
}

/// `numerator / denominator`, floored and saturated to `u64`.
fn floor_div(numerator: u128, denominator: u64) -> u64 {
    let quotient = numerator / u128::from(denominator.max(1));
    u64::try_from(quotient).unwrap_or(u64::MAX)
}

fn concat(left: &Relation, right: &Relation) -> Vec<Attribute> {
    left.attributes()
        .iter()
        .chain(right.attributes())
        .cloned()
        .collect()
}

fn with_estimate(attributes: &[Attribute], targets: &[&str], distinct: u64) -> Vec<Attribute> {
    attributes
        .iter()
        .map(|attr| {
            if targets.contains(&attr.name()) {
                attr.with_distinct_values(distinct)
            } else {
                attr.clone()
            }
        })
        .collect()
}

fn names(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(Attribute::name)
        .collect::<Vec<_>>()
        .join(",")
}
