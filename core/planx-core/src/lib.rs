//! # planx: 관계 대수 쿼리 플래너 코어
//!
//! planx estimates the output size of every sub-plan of a relational-algebra
//! query and rewrites naive plans into left-deep join chains with filters and
//! projections pushed toward the scans.
//!
//! ## 빠른 시작
//!
//! ```rust
//! use planx_core::{Attribute, Catalog, Estimator, LogicalPlan, Predicate, QueryOptimizer};
//!
//! # fn main() -> planx_core::PlanxResult<()> {
//! let mut catalog = Catalog::new();
//! catalog.create_relation("A", 100)?;
//! catalog.create_attribute("A", "a1", 100)?;
//! catalog.create_attribute("A", "a2", 15)?;
//! catalog.create_relation("B", 150)?;
//! catalog.create_attribute("B", "b1", 150)?;
//! catalog.create_attribute("B", "b3", 5)?;
//!
//! let mut plan = LogicalPlan::project(
//!     LogicalPlan::select(
//!         LogicalPlan::product(
//!             LogicalPlan::scan(&catalog, "A")?,
//!             LogicalPlan::scan(&catalog, "B")?,
//!         ),
//!         Predicate::join(Attribute::named("a2"), Attribute::named("b3")),
//!     ),
//!     vec![Attribute::named("a2"), Attribute::named("b1")],
//! );
//!
//! let estimator = Estimator::new();
//! estimator.estimate(&mut plan)?;
//! assert_eq!(plan.output().map(|r| r.row_count()), Some(1000));
//!
//! let mut optimized = QueryOptimizer::new().optimize(&plan, &catalog)?;
//! estimator.estimate(&mut optimized)?;
//! assert_eq!(optimized.output().map(|r| r.row_count()), Some(1000));
//! assert!(optimized.is_left_deep());
//! # Ok(())
//! # }
//! ```
//!
//! ## 모듈 구조
//!
//! - [`plan`]: Attribute / Relation / Predicate, the operator tree, the inspector
//! - [`catalog`]: base relations and static statistics
//! - [`estimator`]: bottom-up cardinality estimation
//! - [`optimizer`]: greedy left-deep join planning
//! - [`workload`]: JSON workload files for the `planx` driver

pub mod catalog;
pub mod error;
pub mod estimator;
pub mod optimizer;
pub mod plan;
pub mod workload;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{PlanxError, PlanxResult};
pub use estimator::Estimator;
pub use optimizer::{OptimizerConfig, QueryOptimizer};
pub use plan::{Attribute, LogicalPlan, Operand, PlanNode, Predicate, Relation, explain};
pub use workload::{QuerySpec, Workload};
