//! 논리 플랜: 관계 대수 연산자 트리
//!
//! Every node carries an annotation slot filled by the
//! [`Estimator`](crate::estimator::Estimator). Reading an empty slot from a
//! parent is a programming error and is reported as `None`.

use crate::catalog::Catalog;
use crate::error::PlanxResult;
use crate::plan::types::{Attribute, Predicate, Relation};

/// A plan node: the operator plus its estimated output relation.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalPlan {
    node: PlanNode,
    output: Option<Relation>,
}

/// The five relational operators.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    /// Base relation scan
    Scan { table: String, relation: Relation },
    /// Equality filter (`a = c` or `a = b`)
    Select {
        input: Box<LogicalPlan>,
        predicate: Predicate,
    },
    /// Column subset, order preserved, no deduplication
    Project {
        input: Box<LogicalPlan>,
        attributes: Vec<Attribute>,
    },
    /// Cartesian product
    Product {
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
    },
    /// Equi-join
    Join {
        left: Box<LogicalPlan>,
        right: Box<LogicalPlan>,
        predicate: Predicate,
    },
}

impl LogicalPlan {
    pub fn new(node: PlanNode) -> Self {
        Self { node, output: None }
    }

    /// Scan of a catalog relation; fails with `UnknownRelation` when absent.
    pub fn scan(catalog: &Catalog, table: &str) -> PlanxResult<Self> {
        let relation = catalog.get_relation(table)?.clone();
        Ok(Self::scan_relation(table, relation))
    }

    pub fn scan_relation(table: impl Into<String>, relation: Relation) -> Self {
        Self::new(PlanNode::Scan {
            table: table.into(),
            relation,
        })
    }

    pub fn select(input: LogicalPlan, predicate: Predicate) -> Self {
        Self::new(PlanNode::Select {
            input: Box::new(input),
            predicate,
        })
    }

    pub fn project(input: LogicalPlan, attributes: Vec<Attribute>) -> Self {
        Self::new(PlanNode::Project {
            input: Box::new(input),
            attributes,
        })
    }

    pub fn product(left: LogicalPlan, right: LogicalPlan) -> Self {
        Self::new(PlanNode::Product {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn join(left: LogicalPlan, right: LogicalPlan, predicate: Predicate) -> Self {
        Self::new(PlanNode::Join {
            left: Box::new(left),
            right: Box::new(right),
            predicate,
        })
    }

    pub fn node(&self) -> &PlanNode {
        &self.node
    }

    pub(crate) fn node_mut(&mut self) -> &mut PlanNode {
        &mut self.node
    }

    /// Estimated output, once the estimator has visited this node.
    pub fn output(&self) -> Option<&Relation> {
        self.output.as_ref()
    }

    pub(crate) fn set_output(&mut self, output: Relation) {
        self.output = Some(output);
    }

    /// Child nodes, left before right.
    pub fn inputs(&self) -> Vec<&LogicalPlan> {
        match &self.node {
            PlanNode::Scan { .. } => vec![],
            PlanNode::Select { input, .. } | PlanNode::Project { input, .. } => vec![input],
            PlanNode::Product { left, right } | PlanNode::Join { left, right, .. } => {
                vec![left, right]
            }
        }
    }

    /// Base relation names of every leaf, left to right.
    pub fn tables(&self) -> Vec<String> {
        match &self.node {
            PlanNode::Scan { table, .. } => vec![table.clone()],
            _ => self.inputs().into_iter().flat_map(|p| p.tables()).collect(),
        }
    }

    /// Output column names, derived from the plan shape alone (no estimation needed).
    pub fn column_names(&self) -> Vec<String> {
        match &self.node {
            PlanNode::Scan { relation, .. } => relation
                .attributes()
                .iter()
                .map(|a| a.name().to_string())
                .collect(),
            PlanNode::Select { input, .. } => input.column_names(),
            PlanNode::Project { attributes, .. } => {
                attributes.iter().map(|a| a.name().to_string()).collect()
            }
            PlanNode::Product { left, right } | PlanNode::Join { left, right, .. } => {
                let mut names = left.column_names();
                names.extend(right.column_names());
                names
            }
        }
    }

    /// True unless some Join has another Join somewhere in its right subtree.
    pub fn is_left_deep(&self) -> bool {
        match &self.node {
            PlanNode::Join { left, right, .. } => {
                !right.contains_join() && left.is_left_deep()
            }
            _ => self.inputs().into_iter().all(LogicalPlan::is_left_deep),
        }
    }

    /// Number of Join nodes in the tree.
    pub fn join_count(&self) -> usize {
        let own = usize::from(matches!(self.node, PlanNode::Join { .. }));
        own + self
            .inputs()
            .into_iter()
            .map(LogicalPlan::join_count)
            .sum::<usize>()
    }

    fn contains_join(&self) -> bool {
        self.join_count() > 0
    }
}
