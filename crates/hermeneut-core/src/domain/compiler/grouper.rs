//! Event grouping
//!
//! Relations that describe one real-world occurrence share a group key.
//! Groups keep the order in which their key was first seen.

use std::collections::HashMap;

use crate::domain::graph::{EntityType, Relation};

use super::classifier::{EventCategory, GroupKey};

/// A relation that passed preparation, in its corrected direction
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRelation {
    /// Position in the input payload
    pub index: usize,
    pub relation: Relation,
    pub category: EventCategory,
    pub source_type: EntityType,
    pub target_type: EntityType,
}

impl PreparedRelation {
    pub fn source_id(&self) -> &str {
        &self.relation.source_id
    }

    pub fn target_id(&self) -> &str {
        &self.relation.target_id
    }

    pub fn relation_type(&self) -> &str {
        &self.relation.relation_type
    }
}

/// Relations sharing one group key
#[derive(Debug, Clone, PartialEq)]
pub struct EventGroup {
    pub key: GroupKey,
    pub relations: Vec<PreparedRelation>,
}

impl EventGroup {
    pub fn category(&self) -> EventCategory {
        self.key.category
    }

    /// Id of the central entity
    pub fn central(&self) -> &str {
        &self.key.central
    }

    /// Relations of one type, in input order
    pub fn of_type<'a>(&'a self, relation_type: &'a str) -> impl Iterator<Item = &'a PreparedRelation> {
        self.relations
            .iter()
            .filter(move |r| r.relation_type() == relation_type)
    }
}

/// Partitions relations into groups keyed by (category, source)
#[derive(Debug, Default)]
pub struct EventGrouper {
    groups: Vec<EventGroup>,
    index: HashMap<GroupKey, usize>,
}

impl EventGrouper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, relation: PreparedRelation) {
        let key = GroupKey::new(relation.category, relation.source_id());
        match self.index.get(&key) {
            Some(&i) => self.groups[i].relations.push(relation),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push(EventGroup {
                    key,
                    relations: vec![relation],
                });
            }
        }
    }

    /// Group a relation list in one go
    pub fn group(relations: impl IntoIterator<Item = PreparedRelation>) -> Vec<EventGroup> {
        let mut grouper = Self::new();
        for relation in relations {
            grouper.push(relation);
        }
        grouper.finish()
    }

    pub fn finish(self) -> Vec<EventGroup> {
        self.groups
    }
}
