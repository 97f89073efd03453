//! Ordered statement log for one partition
//!
//! Blocks are kept structured until the very end. Event records stay mutable
//! so any later group can append to them; rendering happens once in
//! [`turtle`](super::turtle).

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::ontology::Property;

use super::record::{EventKey, EventRecord};

/// An entity node with its class and display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDeclaration {
    pub iri: String,
    pub class: String,
    pub label: String,
    /// Separate appellation node for name-bearing types
    pub appellation: Option<String>,
}

/// An `E55_Type` node named by an appellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub iri: String,
    pub appellation: String,
    pub label: String,
}

/// A single direct triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    pub subject: String,
    pub predicate: Property,
    pub object: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    Entity(EntityDeclaration),
    Classification(Classification),
    /// Position in the buffer's event list
    Event { position: usize },
    Statement(Statement),
}

/// Statement blocks of one partition, in emission order
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    blocks: Vec<Block>,
    events: Vec<EventRecord>,
    event_index: HashMap<EventKey, usize>,
    statements: HashSet<Statement>,
    backpatches: usize,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_entity(&mut self, declaration: EntityDeclaration) {
        self.blocks.push(Block::Entity(declaration));
    }

    pub fn declare_classification(&mut self, classification: Classification) {
        self.blocks.push(Block::Classification(classification));
    }

    /// Position of the record for `key` in this buffer
    pub fn event_position(&self, key: &EventKey) -> Option<usize> {
        self.event_index.get(key).copied()
    }

    /// Add a record, or return the one already open for its key
    pub fn open_event(&mut self, record: EventRecord) -> usize {
        if let Some(position) = self.event_position(&record.key) {
            return position;
        }
        let position = self.events.len();
        self.event_index.insert(record.key.clone(), position);
        self.events.push(record);
        self.blocks.push(Block::Event { position });
        position
    }

    /// Append an edge to an open record
    ///
    /// An edge contributed by a group other than the one that opened the
    /// record counts as a backpatch.
    pub fn append_edge(
        &mut self,
        position: usize,
        predicate: Property,
        object: &str,
        group: &str,
    ) -> bool {
        let Some(record) = self.events.get_mut(position) else {
            return false;
        };
        let added = record.push_edge(predicate, object);
        if added && record.opened_by != group {
            self.backpatches += 1;
        }
        added
    }

    /// Add a direct triple unless it is already present
    pub fn push_statement(
        &mut self,
        subject: impl Into<String>,
        predicate: Property,
        object: impl Into<String>,
    ) -> bool {
        let statement = Statement {
            subject: subject.into(),
            predicate,
            object: object.into(),
        };
        if !self.statements.insert(statement.clone()) {
            return false;
        }
        self.blocks.push(Block::Statement(statement));
        true
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn event(&self, position: usize) -> Option<&EventRecord> {
        self.events.get(position)
    }

    /// Record for `key`, if this buffer holds one
    pub fn event_for(&self, key: &EventKey) -> Option<&EventRecord> {
        self.event_position(key).and_then(|p| self.events.get(p))
    }

    pub fn backpatches(&self) -> usize {
        self.backpatches
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    pub fn entity_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Entity(_)))
            .count()
    }

    /// Records that declare a new event node
    pub fn minted_count(&self) -> usize {
        self.events.iter().filter(|e| e.declared).count()
    }

    /// Amendment records that add at least one edge
    pub fn amended_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| !e.declared && !e.edges().is_empty())
            .count()
    }

    /// Every resource-to-resource triple, in emission order
    ///
    /// Includes appellation links and event edges. Class declarations and
    /// labels are left out.
    pub fn triples(&self) -> Vec<Statement> {
        let mut out = Vec::new();
        let mut push = |subject: &str, predicate: Property, object: &str| {
            out.push(Statement {
                subject: subject.to_string(),
                predicate,
                object: object.to_string(),
            });
        };

        for block in &self.blocks {
            match block {
                Block::Entity(decl) => {
                    if let Some(app) = &decl.appellation {
                        push(&decl.iri, Property::IsIdentifiedBy, app);
                    }
                }
                Block::Classification(c) => push(&c.iri, Property::IsIdentifiedBy, &c.appellation),
                Block::Event { position } => {
                    let record = &self.events[*position];
                    for edge in record.edges() {
                        push(&record.iri, edge.predicate, &edge.object);
                    }
                    if let Some(app) = &record.appellation {
                        push(&record.iri, Property::IsIdentifiedBy, &app.iri);
                    }
                }
                Block::Statement(s) => push(&s.subject, s.predicate, &s.object),
            }
        }
        out
    }

    /// Whether the buffer emits `subject predicate object`
    pub fn has_triple(&self, subject: &str, predicate: Property, object: &str) -> bool {
        self.triples()
            .iter()
            .any(|t| t.subject == subject && t.predicate == predicate && t.object == object)
    }

    /// Local names of every declared entity
    pub fn declared_entities(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Entity(decl) => Some(decl.iri.as_str()),
                _ => None,
            })
            .collect()
    }
}
