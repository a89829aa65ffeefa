//! 플랜 모듈
//!
//! Relational-algebra plan trees and the value types they are built from.

pub mod inspector;
pub mod operator;
pub mod types;

// Re-export main types
pub use inspector::explain;
pub use operator::{LogicalPlan, PlanNode};
pub use types::{Attribute, Operand, Predicate, Relation};
