//! Event records
//!
//! An [`EventRecord`] stays open until the whole batch is rendered, so a later
//! group can still append edges to it.

use serde::Serialize;

use crate::domain::ontology::Property;

/// Kind of minted event node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Creation,
    Birth,
    Death,
    Occupation,
    Role,
    Education,
}

impl EventKind {
    /// CIDOC-CRM class local name
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Creation => "E65_Creation",
            Self::Birth => "E67_Birth",
            Self::Death => "E69_Death",
            Self::Occupation | Self::Role | Self::Education => "E7_Activity",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "creation",
            Self::Birth => "birth",
            Self::Death => "death",
            Self::Occupation => "occupation",
            Self::Role => "role",
            Self::Education => "education",
        }
    }

    /// Property linking the event to its central entity
    pub fn anchor(&self) -> Property {
        match self {
            Self::Creation => Property::HasCreated,
            Self::Birth => Property::BroughtIntoLife,
            Self::Death => Property::WasDeathOf,
            Self::Occupation | Self::Role => Property::CarriedOutBy,
            Self::Education => Property::HadParticipant,
        }
    }
}

/// Identity of a real-world event across both passes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventKey {
    pub kind: EventKind,
    /// Local name of the central entity
    pub central: String,
    /// Local name of the second participant, for per-pair activities
    pub qualifier: Option<String>,
}

impl EventKey {
    pub fn new(kind: EventKind, central: impl Into<String>) -> Self {
        Self {
            kind,
            central: central.into(),
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Creation event of a work
    pub fn creation(work: impl Into<String>) -> Self {
        Self::new(EventKind::Creation, work)
    }
}

impl std::fmt::Display for EventKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}:{}:{}", self.kind.as_str(), self.central, q),
            None => write!(f, "{}:{}", self.kind.as_str(), self.central),
        }
    }
}

/// One `predicate object` pair on an event node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub predicate: Property,
    /// Local name of the object resource
    pub object: String,
}

/// A display-name node attached to a minted resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appellation {
    pub iri: String,
    pub label: String,
}

/// An event node and its edges
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub key: EventKey,
    /// Local name of the event node
    pub iri: String,
    /// False for an amendment: the node was declared in an earlier pass
    pub declared: bool,
    /// Group that opened the record
    pub opened_by: String,
    pub appellation: Option<Appellation>,
    edges: Vec<Edge>,
    /// Edges the event already carries from an earlier pass
    #[serde(skip)]
    inherited: Vec<Edge>,
}

impl EventRecord {
    /// Open a record that declares the event node
    pub fn declared(key: EventKey, iri: impl Into<String>, opened_by: impl Into<String>) -> Self {
        Self {
            key,
            iri: iri.into(),
            declared: true,
            opened_by: opened_by.into(),
            appellation: None,
            edges: Vec::new(),
            inherited: Vec::new(),
        }
    }

    /// Open a record that only adds edges to an event declared elsewhere
    pub fn amendment(key: EventKey, iri: impl Into<String>, opened_by: impl Into<String>) -> Self {
        Self {
            declared: false,
            ..Self::declared(key, iri, opened_by)
        }
    }

    /// Edges written by the pass that declared the event; never repeated here
    pub fn with_inherited(mut self, edges: Vec<Edge>) -> Self {
        self.inherited = edges;
        self
    }

    pub fn with_appellation(mut self, iri: impl Into<String>, label: impl Into<String>) -> Self {
        self.appellation = Some(Appellation {
            iri: iri.into(),
            label: label.into(),
        });
        self
    }

    /// Append an edge; returns false if the record already had it
    pub fn push_edge(&mut self, predicate: Property, object: impl Into<String>) -> bool {
        let edge = Edge {
            predicate,
            object: object.into(),
        };
        if self.edges.contains(&edge) || self.inherited.contains(&edge) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn has_edge(&self, predicate: Property, object: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.predicate == predicate && e.object == object)
    }

    /// An amendment with nothing to add renders as nothing
    pub fn is_empty_amendment(&self) -> bool {
        !self.declared && self.edges.is_empty()
    }
}
