//! Catalog: base relations and their static statistics
//!
//! Row counts and distinct-value counts are fixed at registration time. The
//! planner only ever reads the catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlanxError, PlanxResult};
use crate::plan::{Attribute, Relation};

/// Registry of named base relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    relations: BTreeMap<String, Relation>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty relation with `row_count` tuples.
    pub fn create_relation(&mut self, name: &str, row_count: u64) -> PlanxResult<()> {
        if self.relations.contains_key(name) {
            return Err(PlanxError::DuplicateRelation(name.to_string()));
        }
        self.relations
            .insert(name.to_string(), Relation::new(row_count));
        Ok(())
    }

    /// Attach an attribute with `distinct_values` distinct values to `relation`.
    pub fn create_attribute(
        &mut self,
        relation: &str,
        name: &str,
        distinct_values: u64,
    ) -> PlanxResult<()> {
        if distinct_values == 0 {
            return Err(PlanxError::InvalidStatistics(format!(
                "attribute '{}.{}' must have at least one distinct value",
                relation, name
            )));
        }
        let rel = self
            .relations
            .get_mut(relation)
            .ok_or_else(|| PlanxError::UnknownRelation(relation.to_string()))?;
        if rel.contains(name) {
            return Err(PlanxError::DuplicateAttribute {
                relation: relation.to_string(),
                attribute: name.to_string(),
            });
        }
        rel.add_attribute(Attribute::new(name, distinct_values));
        Ok(())
    }

    pub fn relation_exists(&self, name: &str) -> bool {
        self.relations.contains_key(name)
    }

    pub fn get_relation(&self, name: &str) -> PlanxResult<&Relation> {
        self.relations
            .get(name)
            .ok_or_else(|| PlanxError::UnknownRelation(name.to_string()))
    }

    /// Relation names in sorted order.
    pub fn relation_names(&self) -> impl Iterator<Item = &str> {
        self.relations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Re-check the registration invariants on a deserialized catalog.
    pub fn validate(&self) -> PlanxResult<()> {
        for (name, relation) in &self.relations {
            for (idx, attr) in relation.attributes().iter().enumerate() {
                if attr.distinct_values() == 0 {
                    return Err(PlanxError::InvalidStatistics(format!(
                        "attribute '{}.{}' must have at least one distinct value",
                        name,
                        attr.name()
                    )));
                }
                if relation.attributes()[..idx].contains(attr) {
                    return Err(PlanxError::DuplicateAttribute {
                        relation: name.clone(),
                        attribute: attr.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> PlanxResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_json(&self) -> PlanxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
