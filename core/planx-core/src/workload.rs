//! Workload files: a catalog plus a query, as consumed by the `planx` driver
//!
//! ```json
//! {
//!   "catalog": { "relations": { "A": { "row_count": 100, "attributes": [...] } } },
//!   "query": { "op": "project", "attributes": ["a2"], "input": { "op": "scan", "relation": "A" } },
//!   "optimizer": { "projection_pushdown": true }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::PlanxResult;
use crate::optimizer::OptimizerConfig;
use crate::plan::{Attribute, LogicalPlan, Predicate};

/// Right-hand side of an equality, by attribute name or literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandSpec {
    Attribute(String),
    Value(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateSpec {
    pub left: String,
    pub right: OperandSpec,
}

impl PredicateSpec {
    fn build(&self) -> Predicate {
        let left = Attribute::named(self.left.as_str());
        match &self.right {
            OperandSpec::Attribute(right) => Predicate::join(left, Attribute::named(right.as_str())),
            OperandSpec::Value(value) => Predicate::value(left, value.as_str()),
        }
    }
}

/// Query tree referencing relations and attributes by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QuerySpec {
    Scan {
        relation: String,
    },
    Select {
        input: Box<QuerySpec>,
        predicate: PredicateSpec,
    },
    Project {
        input: Box<QuerySpec>,
        attributes: Vec<String>,
    },
    Product {
        left: Box<QuerySpec>,
        right: Box<QuerySpec>,
    },
    Join {
        left: Box<QuerySpec>,
        right: Box<QuerySpec>,
        predicate: PredicateSpec,
    },
}

impl QuerySpec {
    /// Resolve scans against `catalog`; unknown relations fail here.
    pub fn build(&self, catalog: &Catalog) -> PlanxResult<LogicalPlan> {
        Ok(match self {
            QuerySpec::Scan { relation } => LogicalPlan::scan(catalog, relation)?,
            QuerySpec::Select { input, predicate } => {
                LogicalPlan::select(input.build(catalog)?, predicate.build())
            }
            QuerySpec::Project { input, attributes } => LogicalPlan::project(
                input.build(catalog)?,
                attributes
                    .iter()
                    .map(|a| Attribute::named(a.as_str()))
                    .collect(),
            ),
            QuerySpec::Product { left, right } => {
                LogicalPlan::product(left.build(catalog)?, right.build(catalog)?)
            }
            QuerySpec::Join {
                left,
                right,
                predicate,
            } => LogicalPlan::join(
                left.build(catalog)?,
                right.build(catalog)?,
                predicate.build(),
            ),
        })
    }
}

/// Catalog, query and optimizer settings for one driver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub catalog: Catalog,
    pub query: QuerySpec,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

impl Workload {
    pub fn from_json(json: &str) -> PlanxResult<Self> {
        let workload: Workload = serde_json::from_str(json)?;
        workload.catalog.validate()?;
        Ok(workload)
    }

    pub fn load(path: impl AsRef<Path>) -> PlanxResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn build_plan(&self) -> PlanxResult<LogicalPlan> {
        self.query.build(&self.catalog)
    }

    /// Two relations joined through a product and an attribute select:
    /// `PROJECT [a2,b1] (SELECT [a2=b3] (PRODUCT (A, B)))`.
    pub fn demo() -> PlanxResult<Self> {
        let mut catalog = Catalog::new();
        catalog.create_relation("A", 100)?;
        catalog.create_attribute("A", "a1", 100)?;
        catalog.create_attribute("A", "a2", 15)?;
        catalog.create_relation("B", 150)?;
        catalog.create_attribute("B", "b1", 150)?;
        catalog.create_attribute("B", "b2", 100)?;
        catalog.create_attribute("B", "b3", 5)?;

        let scan = |name: &str| {
            Box::new(QuerySpec::Scan {
                relation: name.to_string(),
            })
        };
        let query = QuerySpec::Project {
            input: Box::new(QuerySpec::Select {
                input: Box::new(QuerySpec::Product {
                    left: scan("A"),
                    right: scan("B"),
                }),
                predicate: PredicateSpec {
                    left: "a2".to_string(),
                    right: OperandSpec::Attribute("b3".to_string()),
                },
            }),
            attributes: vec!["a2".to_string(), "b1".to_string()],
        };

        Ok(Self {
            catalog,
            query,
            optimizer: OptimizerConfig::default(),
        })
    }
}
