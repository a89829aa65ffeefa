//! Error types for the planx planning core.
//!
//! All public APIs return `PlanxResult<T>`; library code does not panic.

use thiserror::Error;

/// Unified error type for all planx operations.
#[derive(Debug, Error)]
pub enum PlanxError {
    /// A predicate or projection references an attribute the input does not have
    #[error("attribute '{attribute}' not found\nContext: {context}")]
    AttributeNotFound { attribute: String, context: String },

    /// Requested relation is not registered in the catalog
    #[error("relation '{0}' not found")]
    UnknownRelation(String),

    /// Join predicates do not connect every scan of the plan
    #[error("disconnected plan: no join predicate reaches {}", unreachable.join(", "))]
    DisconnectedPlan { unreachable: Vec<String> },

    /// Relation registered twice
    #[error("relation '{0}' already exists")]
    DuplicateRelation(String),

    /// Attribute registered twice on the same relation
    #[error("attribute '{attribute}' already exists on relation '{relation}'")]
    DuplicateAttribute { relation: String, attribute: String },

    /// Statistics that break the estimator's preconditions (e.g. zero distinct values)
    #[error("invalid statistics: {0}")]
    InvalidStatistics(String),

    /// Plan without any scan
    #[error("plan contains no scan")]
    EmptyPlan,

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Standard I/O error
    #[error("io error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PlanxError {
    /// Shorthand for [`PlanxError::AttributeNotFound`].
    pub fn attribute_not_found(attribute: impl Into<String>, context: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            attribute: attribute.into(),
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for PlanxError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type PlanxResult<T> = Result<T, PlanxError>;
