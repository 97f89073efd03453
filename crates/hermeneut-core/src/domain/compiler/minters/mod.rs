//! Event minters
//!
//! One minter per event category. A minter receives a group of relations
//! whose entities are already declared and turns it into event records and
//! direct statements through a [`MintContext`].
//!
//! ```text
//!   EventGroup ──► EventMinter::mint ──► MintContext ──┬─► OutputBuffer
//!                                                      └─► EntityRegistry
//! ```

mod activity;
mod association;
mod attribute;
mod competence;
mod creation;
mod influence;
mod life;
mod location;

use std::collections::HashMap;

use tracing::debug;

use crate::domain::graph::{ClaimType, Diagnostic, GraphInput, Node};
use crate::domain::ontology::Property;

use super::CompileOptions;
use super::buffer::{Classification, OutputBuffer};
use super::classifier::EventCategory;
use super::grouper::{EventGroup, PreparedRelation};
use super::record::{EventKey, EventRecord};
use super::registry::EntityRegistry;

pub use activity::{EducationMinter, OccupationMinter, RoleMinter};
pub use association::AssociationMinter;
pub use attribute::{ResidenceMinter, WorkClassificationMinter};
pub use competence::{ExpertiseMinter, LanguageMinter};
pub use creation::CreationMinter;
pub use influence::InfluenceMinter;
pub use life::{BirthMinter, DeathMinter};
pub use location::LocationMinter;

/// Builds the graph shape of one event category
pub trait EventMinter: Send + Sync {
    /// Category this minter handles
    fn category(&self) -> EventCategory;

    /// Mint one group
    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>);
}

/// Minters by category
pub struct MinterSet {
    minters: HashMap<EventCategory, Box<dyn EventMinter>>,
}

impl Default for MinterSet {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for MinterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<_> = self.minters.keys().map(|c| c.as_str()).collect();
        categories.sort_unstable();
        f.debug_struct("MinterSet")
            .field("categories", &categories)
            .finish()
    }
}

impl MinterSet {
    pub fn empty() -> Self {
        Self {
            minters: HashMap::new(),
        }
    }

    /// A minter for every category
    pub fn with_defaults() -> Self {
        let mut set = Self::empty();
        set.register(Box::new(CreationMinter));
        set.register(Box::new(InfluenceMinter));
        set.register(Box::new(LocationMinter));
        set.register(Box::new(AssociationMinter));
        set.register(Box::new(BirthMinter));
        set.register(Box::new(DeathMinter));
        set.register(Box::new(LanguageMinter));
        set.register(Box::new(ExpertiseMinter));
        set.register(Box::new(OccupationMinter));
        set.register(Box::new(RoleMinter));
        set.register(Box::new(ResidenceMinter));
        set.register(Box::new(EducationMinter));
        set.register(Box::new(WorkClassificationMinter));
        set
    }

    /// Add or replace the minter for its category
    pub fn register(&mut self, minter: Box<dyn EventMinter>) {
        self.minters.insert(minter.category(), minter);
    }

    pub fn get(&self, category: EventCategory) -> Option<&dyn EventMinter> {
        self.minters.get(&category).map(|m| m.as_ref())
    }
}

/// Everything a minter may read or write during one pass
pub struct MintContext<'a> {
    pub input: &'a GraphInput,
    pub registry: &'a mut EntityRegistry,
    pub buffer: &'a mut OutputBuffer,
    pub diagnostics: &'a mut Vec<Diagnostic>,
    pub options: &'a CompileOptions,
    /// Partition being compiled
    pub claim: ClaimType,
}

impl<'a> MintContext<'a> {
    pub fn node(&self, node_id: &str) -> Option<&'a Node> {
        self.input.node(node_id)
    }

    /// Local name of a declared entity
    pub fn iri(&self, node_id: &str) -> Option<String> {
        self.registry.iri(node_id).map(str::to_string)
    }

    /// Local names of a relation's source and target
    pub fn endpoints(&self, relation: &PreparedRelation) -> Option<(String, String)> {
        Some((
            self.iri(relation.source_id())?,
            self.iri(relation.target_id())?,
        ))
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!(code = diagnostic.code(), layer = self.claim.layer(), "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Report a subject/object combination the minter does not emit
    pub fn unsupported(&mut self, relation: &PreparedRelation) {
        self.report(Diagnostic::UnsupportedShape {
            relation_index: relation.index,
            relation_type: relation.relation_type().to_string(),
            source_type: relation.source_type,
            target_type: relation.target_type,
        });
    }

    /// Event already open in this pass, or declared by an earlier pass
    ///
    /// An event from an earlier pass gets an amendment record in this buffer.
    pub fn existing_event(&mut self, key: &EventKey, group: &str) -> Option<usize> {
        if let Some(position) = self.buffer.event_position(key) {
            return Some(position);
        }
        let iri = self.registry.event(key)?.to_string();
        debug!(event = %iri, layer = self.claim.layer(), "Amending event from an earlier pass");
        let record = EventRecord::amendment(key.clone(), iri, group)
            .with_inherited(self.registry.event_edges(key).to_vec());
        Some(self.buffer.open_event(record))
    }

    /// Get or open the event for `key`, named `<central>_<kind>`
    pub fn open_event(&mut self, key: EventKey, group: &str) -> usize {
        let base = format!("{}_{}", key.central, key.kind.as_str());
        self.open_event_named(key, &base, None, group)
    }

    /// Get or open an event with an explicit base name and optional appellation
    pub fn open_event_named(
        &mut self,
        key: EventKey,
        base: &str,
        label: Option<String>,
        group: &str,
    ) -> usize {
        if let Some(position) = self.existing_event(&key, group) {
            return position;
        }

        let iri = self.registry.reserve(base);
        self.registry.remember_event(key.clone(), &iri);
        let mut record = EventRecord::declared(key.clone(), &iri, group);
        if let Some(label) = label {
            let appellation = self.registry.reserve(&format!("{iri}_appellation"));
            record = record.with_appellation(appellation, label);
        }

        debug!(event = %iri, group_key = %group, layer = self.claim.layer(), "Opened event");
        let position = self.buffer.open_event(record);
        self.add_edge(position, key.kind.anchor(), &key.central, group);
        position
    }

    pub fn add_edge(&mut self, position: usize, predicate: Property, object: &str, group: &str) {
        if !self.buffer.append_edge(position, predicate, object, group) {
            return;
        }
        if let Some(record) = self.buffer.event(position) {
            self.registry.record_event_edge(&record.key, predicate, object);
        }
    }

    pub fn statement(&mut self, subject: &str, predicate: Property, object: &str) {
        self.buffer.push_statement(subject, predicate, object);
    }

    /// Get or declare a classification node; returns its local name
    pub fn classification(&mut self, key: &str, base: &str, label: String) -> String {
        if let Some(iri) = self.registry.classification(key) {
            return iri.to_string();
        }
        let iri = self.registry.reserve(base);
        let appellation = self.registry.reserve(&format!("{iri}_appellation"));
        self.registry.remember_classification(key, &iri);
        self.buffer.declare_classification(Classification {
            iri: iri.clone(),
            appellation,
            label,
        });
        iri
    }
}
