//! Relations for the claim graph
//!
//! A relation is a directed, typed link between two nodes, tagged with the
//! kind of claim it makes: an established fact or an authorial argument.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A directed relation between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// ID of the source node
    pub source_id: String,
    /// ID of the target node
    pub target_id: String,
    /// Relation type, normalized to lowercase (e.g., "created_by")
    pub relation_type: String,
    /// Open key/value properties supplied by the extractor
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Extraction confidence (0.0 to 1.0)
    pub confidence: f32,
    /// Fact or argument
    pub claim_type: ClaimType,
}

impl Relation {
    /// Create a new relation
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relation_type: impl Into<String>,
        claim_type: ClaimType,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation_type: normalize_relation_type(&relation_type.into()),
            properties: Map::new(),
            confidence: 1.0,
            claim_type,
        }
    }

    /// Set confidence score
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Attach a property
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Swap source and target
    pub fn reversed(&self) -> Self {
        Self {
            source_id: self.target_id.clone(),
            target_id: self.source_id.clone(),
            ..self.clone()
        }
    }
}

/// Normalize a relation type string for table lookups
pub fn normalize_relation_type(relation_type: &str) -> String {
    relation_type.trim().to_lowercase()
}

/// Partition tag of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimType {
    /// Presented as established, uncontested fact
    #[serde(rename = "established_fact", alias = "fact")]
    Fact,
    /// What the author argues, proposes or claims
    #[serde(rename = "authorial_argument", alias = "argument")]
    Argument,
}

impl ClaimType {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fact => "established_fact",
            Self::Argument => "authorial_argument",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fact" | "established_fact" => Some(Self::Fact),
            "argument" | "authorial_argument" => Some(Self::Argument),
            _ => None,
        }
    }

    /// Short layer name used in logs
    pub fn layer(&self) -> &'static str {
        match self {
            Self::Fact => "facts",
            Self::Argument => "arguments",
        }
    }
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_creation() {
        let rel = Relation::new("w1", "p1", " Created_By ", ClaimType::Fact).with_confidence(0.9);

        assert_eq!(rel.source_id, "w1");
        assert_eq!(rel.target_id, "p1");
        assert_eq!(rel.relation_type, "created_by");
        assert_eq!(rel.confidence, 0.9);
        assert!(rel.properties.is_empty());
    }

    #[test]
    fn test_reversed_keeps_metadata() {
        let rel = Relation::new("d1", "w1", "created_during", ClaimType::Argument)
            .with_property("evidence", Value::String("colophon".into()));
        let swapped = rel.reversed();

        assert_eq!(swapped.source_id, "w1");
        assert_eq!(swapped.target_id, "d1");
        assert_eq!(swapped.claim_type, ClaimType::Argument);
        assert_eq!(swapped.properties.len(), 1);
    }

    #[test]
    fn test_claim_type_parsing() {
        assert_eq!(ClaimType::parse("fact"), Some(ClaimType::Fact));
        assert_eq!(ClaimType::parse("established_fact"), Some(ClaimType::Fact));
        assert_eq!(ClaimType::parse("Authorial_Argument"), Some(ClaimType::Argument));
        assert_eq!(ClaimType::parse("interpretation"), None);
    }

    #[test]
    fn test_claim_type_serde_aliases() {
        let fact: ClaimType = serde_json::from_str("\"fact\"").unwrap();
        let argument: ClaimType = serde_json::from_str("\"authorial_argument\"").unwrap();
        assert_eq!(fact, ClaimType::Fact);
        assert_eq!(argument, ClaimType::Argument);
        assert_eq!(
            serde_json::to_string(&ClaimType::Fact).unwrap(),
            "\"established_fact\""
        );
    }
}
