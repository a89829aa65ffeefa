//! 플랜 기본 타입: Attribute, Relation, Predicate
//!
//! An [`Attribute`] is identified by its name alone. Two attributes with the
//! same name but different distinct-value estimates are the same column seen at
//! different estimation stages, so `PartialEq`/`Hash` ignore the estimate.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{PlanxError, PlanxResult};

/// A named column carrying its distinct-value estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    distinct_values: u64,
}

impl Attribute {
    pub fn new(name: impl Into<String>, distinct_values: u64) -> Self {
        Self {
            name: name.into(),
            distinct_values,
        }
    }

    /// By-name reference whose statistics are resolved against an input relation.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, 0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distinct_values(&self) -> u64 {
        self.distinct_values
    }

    /// Same column with a new estimate.
    pub fn with_distinct_values(&self, distinct_values: u64) -> Self {
        Self::new(self.name.clone(), distinct_values)
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Row-count estimate plus an ordered attribute list (order = column position).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Relation {
    row_count: u64,
    #[serde(default)]
    attributes: Vec<Attribute>,
}

impl Relation {
    pub fn new(row_count: u64) -> Self {
        Self {
            row_count,
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(row_count: u64, attributes: Vec<Attribute>) -> Self {
        Self {
            row_count,
            attributes,
        }
    }

    /// Builder-style append.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Lookup that fails with [`PlanxError::AttributeNotFound`], naming `context`.
    pub fn require(&self, name: &str, context: impl fmt::Display) -> PlanxResult<&Attribute> {
        self.attribute(name)
            .ok_or_else(|| PlanxError::attribute_not_found(name, context.to_string()))
    }

    /// True when the two relations have at least one attribute name in common.
    pub fn shares_attribute_with(&self, other: &Relation) -> bool {
        self.attributes.iter().any(|a| other.contains(a.name()))
    }
}

/// Right-hand side of an equality predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Attribute(Attribute),
    Value(String),
}

/// `attr = literal` (value predicate) or `attr = attr` (join predicate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    left: Attribute,
    right: Operand,
}

impl Predicate {
    pub fn value(left: Attribute, literal: impl Into<String>) -> Self {
        Self {
            left,
            right: Operand::Value(literal.into()),
        }
    }

    pub fn join(left: Attribute, right: Attribute) -> Self {
        Self {
            left,
            right: Operand::Attribute(right),
        }
    }

    pub fn left(&self) -> &Attribute {
        &self.left
    }

    pub fn right(&self) -> &Operand {
        &self.right
    }

    /// The right attribute of a join predicate; `None` for literal comparisons.
    pub fn right_attribute(&self) -> Option<&Attribute> {
        match &self.right {
            Operand::Attribute(attr) => Some(attr),
            Operand::Value(_) => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.right, Operand::Value(_))
    }

    /// Every attribute the predicate references, left first.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        std::iter::once(&self.left).chain(self.right_attribute())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.right {
            Operand::Attribute(right) => write!(f, "{}={}", self.left, right),
            Operand::Value(value) => write!(f, "{}=\"{}\"", self.left, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_attribute_identity_ignores_estimate() {
        let a = Attribute::new("a1", 100);
        let b = Attribute::new("a1", 3);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&Attribute::named("a2")));
    }

    #[test]
    fn test_with_distinct_values_builds_new_value() {
        let a = Attribute::new("a1", 100);
        let b = a.with_distinct_values(1);
        assert_eq!(a.distinct_values(), 100);
        assert_eq!(b.distinct_values(), 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_relation_lookup() {
        let rel = Relation::new(10)
            .with_attribute(Attribute::new("x", 5))
            .with_attribute(Attribute::new("y", 2));
        assert_eq!(rel.attribute("y").map(Attribute::distinct_values), Some(2));
        assert!(rel.contains("x"));
        assert!(!rel.contains("z"));

        let err = rel.require("z", "PROJECT [z]").unwrap_err();
        match err {
            PlanxError::AttributeNotFound { attribute, context } => {
                assert_eq!(attribute, "z");
                assert_eq!(context, "PROJECT [z]");
            }
            other => panic!("Expected AttributeNotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_relation_without_attributes_is_valid() {
        let rel = Relation::new(42);
        assert_eq!(rel.row_count(), 42);
        assert!(rel.attributes().is_empty());
    }

    #[test]
    fn test_predicate_kinds() {
        let value = Predicate::value(Attribute::named("a1"), "7");
        assert!(value.is_literal());
        assert_eq!(value.right_attribute(), None);
        assert_eq!(value.to_string(), "a1=\"7\"");

        let join = Predicate::join(Attribute::named("a2"), Attribute::named("b3"));
        assert!(!join.is_literal());
        let names: Vec<&str> = join.attributes().map(Attribute::name).collect();
        assert_eq!(names, vec!["a2", "b3"]);
        assert_eq!(join.to_string(), "a2=b3");
    }
}
