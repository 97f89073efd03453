//! Entity (node) types for the claim graph
//!
//! Nodes are the typed entities an extractor found in a scholarly document:
//! works, people, places, dates and so on. They arrive as an immutable batch
//! and are only ever read by the compiler.

use serde::{Deserialize, Serialize};

/// A typed entity extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier, unique within one payload
    pub id: String,
    /// Type of entity
    pub entity_type: EntityType,
    /// Display name as written in the source
    pub name: String,
    /// Extraction confidence (0.0 to 1.0)
    pub confidence: f32,
}

impl Node {
    /// Create a new node with the default confidence of 1.0
    pub fn new(id: impl Into<String>, entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type,
            name: name.into(),
            confidence: 1.0,
        }
    }

    /// Set confidence score
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Whether this node is declared with a separate appellation node
    pub fn has_appellation(&self) -> bool {
        self.entity_type.has_appellation()
    }
}

/// Types of extracted entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Literary or documentary work (e.g., "Van den vos Reynaerde")
    Work,
    /// Historical or contemporary person
    Person,
    /// Organization or institution
    Organization,
    /// Geographic place
    Place,
    /// Abstract concept
    Concept,
    /// Natural language (e.g., "Old French")
    Language,
    /// Period or broader cultural framework
    HistoricalContext,
    /// Date or time span
    Date,
    /// Bibliographic reference
    Reference,
    /// Role held by a person
    Role,
    /// Profession (e.g., "monk")
    Occupation,
    /// Scholarly methodology
    Methodology,
    /// Literary genre
    Genre,
    /// Historical event
    Event,
    /// Informal group of people
    Group,
    /// Activity
    Activity,
    /// Stylistic or physical characteristic
    Characteristic,
    /// Theme of a work
    Theme,
}

impl EntityType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Place => "place",
            Self::Concept => "concept",
            Self::Language => "language",
            Self::HistoricalContext => "historical_context",
            Self::Date => "date",
            Self::Reference => "reference",
            Self::Role => "role",
            Self::Occupation => "occupation",
            Self::Methodology => "methodology",
            Self::Genre => "genre",
            Self::Event => "event",
            Self::Group => "group",
            Self::Activity => "activity",
            Self::Characteristic => "characteristic",
            Self::Theme => "theme",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" => Some(Self::Work),
            "person" | "author" => Some(Self::Person),
            "organization" | "organisation" => Some(Self::Organization),
            "place" => Some(Self::Place),
            "concept" => Some(Self::Concept),
            "language" => Some(Self::Language),
            "historical_context" | "historicalcontext" => Some(Self::HistoricalContext),
            "date" => Some(Self::Date),
            "reference" => Some(Self::Reference),
            "role" => Some(Self::Role),
            "occupation" => Some(Self::Occupation),
            "methodology" => Some(Self::Methodology),
            "genre" => Some(Self::Genre),
            "event" => Some(Self::Event),
            "group" => Some(Self::Group),
            "activity" => Some(Self::Activity),
            "characteristic" => Some(Self::Characteristic),
            "theme" => Some(Self::Theme),
            _ => None,
        }
    }

    /// Get all entity types, in declaration order
    ///
    /// The first eight are the types the facts block lists first; the rest
    /// follow in this order.
    pub fn all() -> &'static [EntityType] {
        &[
            Self::Work,
            Self::Person,
            Self::Organization,
            Self::Place,
            Self::Concept,
            Self::Language,
            Self::HistoricalContext,
            Self::Date,
            Self::Reference,
            Self::Role,
            Self::Occupation,
            Self::Methodology,
            Self::Genre,
            Self::Event,
            Self::Group,
            Self::Activity,
            Self::Characteristic,
            Self::Theme,
        ]
    }

    /// Position of this type in the declaration order
    pub fn declaration_rank(&self) -> usize {
        Self::all()
            .iter()
            .position(|t| t == self)
            .unwrap_or(usize::MAX)
    }

    /// Name-bearing types get a separate appellation node
    pub fn has_appellation(&self) -> bool {
        matches!(
            self,
            Self::Work | Self::Person | Self::Place | Self::Organization
        )
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
