//! Plan inspector: read-only rendering of (annotated) plans
//!
//! `Display` gives the one-line algebra form; [`explain`] gives an indented
//! tree with each node's estimate.

use std::fmt::{self, Write as _};

use crate::plan::operator::{LogicalPlan, PlanNode};
use crate::plan::types::{Attribute, Relation};

fn attribute_list(attributes: &[Attribute]) -> String {
    attributes
        .iter()
        .map(Attribute::name)
        .collect::<Vec<_>>()
        .join(",")
}

fn annotation(relation: &Relation) -> String {
    let mut out = format!("rows={}", relation.row_count());
    for attr in relation.attributes() {
        let _ = write!(out, " {}({})", attr.name(), attr.distinct_values());
    }
    out
}

impl LogicalPlan {
    /// Operator name plus its own arguments, without inputs (e.g. `SELECT [a2=b3]`).
    pub fn label(&self) -> String {
        match self.node() {
            PlanNode::Scan { table, .. } => format!("SCAN {}", table),
            PlanNode::Select { predicate, .. } => format!("SELECT [{}]", predicate),
            PlanNode::Project { attributes, .. } => {
                format!("PROJECT [{}]", attribute_list(attributes))
            }
            PlanNode::Product { .. } => "PRODUCT".to_string(),
            PlanNode::Join { predicate, .. } => format!("JOIN [{}]", predicate),
        }
    }
}

impl fmt::Display for LogicalPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node() {
            PlanNode::Scan { table, .. } => f.write_str(table),
            PlanNode::Select { input, .. } | PlanNode::Project { input, .. } => {
                write!(f, "{} ({})", self.label(), input)
            }
            PlanNode::Product { left, right } | PlanNode::Join { left, right, .. } => {
                write!(f, "{} ({}, {})", self.label(), left, right)
            }
        }
    }
}

/// Indented tree, one node per line, annotated when estimated.
pub fn explain(plan: &LogicalPlan) -> String {
    let mut out = String::new();
    explain_into(plan, 0, &mut out);
    out
}

fn explain_into(plan: &LogicalPlan, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{}", "", plan.label(), indent = depth * 2);
    if let Some(relation) = plan.output() {
        let _ = write!(out, "  {}", annotation(relation));
    }
    out.push('\n');
    for input in plan.inputs() {
        explain_into(input, depth + 1, out);
    }
}
