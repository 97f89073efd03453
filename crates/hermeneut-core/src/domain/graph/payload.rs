//! Input payload and its validated form
//!
//! Extractors hand over loosely-typed JSON. [`GraphPayload`] only fixes the
//! outer shape; each record stays a JSON value until
//! [`GraphInput::from_payload`] reads it as a [`RawNode`] or [`RawRelation`]
//! and validates it into a typed [`Node`] or [`Relation`]. Every record it has
//! to reject becomes a [`Diagnostic`] instead of failing the whole document.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

use super::diagnostic::Diagnostic;
use super::entity::{EntityType, Node};
use super::relationship::{ClaimType, Relation, normalize_relation_type};

/// Raw payload as produced by the extraction stage
///
/// Accepts both the bare `{nodes, relations}` shape and the
/// `{work_schema_metadata: {interpretation_layer: {...}}}` wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphPayload {
    Wrapped {
        work_schema_metadata: WorkSchemaMetadata,
    },
    Bare(RawGraph),
}

impl GraphPayload {
    /// Parse a payload from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidPayload("top-level value is not an object".into()));
        }
        serde_json::from_value(value).map_err(|e| Error::InvalidPayload(e.to_string()))
    }

    /// The node/relation layer, whatever the wrapping
    pub fn into_graph(self) -> RawGraph {
        match self {
            Self::Wrapped {
                work_schema_metadata,
            } => work_schema_metadata.interpretation_layer,
            Self::Bare(graph) => graph,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSchemaMetadata {
    pub interpretation_layer: RawGraph,
}

/// Nodes and relations before validation
///
/// `null` lists read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawGraph {
    #[serde(deserialize_with = "records")]
    pub nodes: Vec<Value>,
    #[serde(default, deserialize_with = "records")]
    pub relations: Vec<Value>,
}

fn records<'de, D>(deserializer: D) -> std::result::Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRelation {
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub relation_type: Option<String>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub claim_type: Option<String>,
}

/// A relation together with its position in the input payload
#[derive(Debug, Clone, PartialEq)]
pub struct InputRelation {
    /// Position in the payload's relation list
    pub index: usize,
    pub relation: Relation,
}

/// Validated, immutable compiler input
#[derive(Debug, Clone, Default)]
pub struct GraphInput {
    nodes: Vec<Node>,
    relations: Vec<InputRelation>,
    by_id: HashMap<String, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl GraphInput {
    /// Build an input from already-typed nodes and relations
    ///
    /// Relation indices are their positions in `relations`. Duplicate node
    /// ids keep the first node and are reported.
    pub fn new(nodes: Vec<Node>, relations: Vec<Relation>) -> Self {
        let relations = relations
            .into_iter()
            .enumerate()
            .map(|(index, relation)| InputRelation { index, relation })
            .collect();
        Self::assemble(nodes, relations, Vec::new())
    }

    /// Parse and validate a JSON payload
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(Self::from_payload(GraphPayload::from_json(text)?))
    }

    /// Validate a raw payload
    pub fn from_payload(payload: GraphPayload) -> Self {
        let raw = payload.into_graph();
        let mut diagnostics = Vec::new();

        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for (node_index, value) in raw.nodes.into_iter().enumerate() {
            let raw_node = match serde_json::from_value::<RawNode>(value) {
                Ok(raw_node) => raw_node,
                Err(e) => {
                    debug!(node_index, error = %e, "Unreadable node record");
                    diagnostics.push(Diagnostic::InvalidNode {
                        node_index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if let Some(node) = validate_node(node_index, raw_node, &mut diagnostics) {
                nodes.push(node);
            }
        }

        let mut relations = Vec::with_capacity(raw.relations.len());
        for (index, value) in raw.relations.into_iter().enumerate() {
            let raw_relation = match serde_json::from_value::<RawRelation>(value) {
                Ok(raw_relation) => raw_relation,
                Err(e) => {
                    debug!(relation_index = index, error = %e, "Unreadable relation record");
                    diagnostics.push(Diagnostic::InvalidRelation {
                        relation_index: index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };
            if let Some(relation) = validate_relation(index, raw_relation, &mut diagnostics) {
                relations.push(InputRelation { index, relation });
            }
        }

        Self::assemble(nodes, relations, diagnostics)
    }

    fn assemble(
        nodes: Vec<Node>,
        relations: Vec<InputRelation>,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut kept = Vec::with_capacity(nodes.len());
        for node in nodes {
            if by_id.contains_key(&node.id) {
                debug!(node_id = %node.id, "Dropping duplicate node");
                diagnostics.push(Diagnostic::DuplicateNode { node_id: node.id });
                continue;
            }
            by_id.insert(node.id.clone(), kept.len());
            kept.push(node);
        }

        Self {
            nodes: kept,
            relations,
            by_id,
            diagnostics,
        }
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    /// Position of a node in input order
    pub fn node_position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// All valid nodes, in input order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All readable relations, in input order
    pub fn relations(&self) -> &[InputRelation] {
        &self.relations
    }

    /// Problems found while reading the payload
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn validate_node(
    node_index: usize,
    raw: RawNode,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Node> {
    let Some(id) = non_empty(raw.id) else {
        diagnostics.push(Diagnostic::InvalidNode {
            node_index,
            reason: "missing id".into(),
        });
        return None;
    };

    let type_name = raw.entity_type.unwrap_or_default();
    let Some(entity_type) = EntityType::parse(&type_name) else {
        diagnostics.push(Diagnostic::UnknownEntityType {
            node_id: id,
            entity_type: type_name,
        });
        return None;
    };

    let Some(name) = non_empty(raw.name) else {
        diagnostics.push(Diagnostic::InvalidNode {
            node_index,
            reason: format!("node '{id}' has no name"),
        });
        return None;
    };

    Some(Node::new(id, entity_type, name).with_confidence(raw.confidence.unwrap_or(1.0)))
}

fn validate_relation(
    relation_index: usize,
    raw: RawRelation,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Relation> {
    let invalid = |reason: &str| Diagnostic::InvalidRelation {
        relation_index,
        reason: reason.to_string(),
    };

    let Some(source_id) = non_empty(raw.source_id) else {
        diagnostics.push(invalid("missing source_id"));
        return None;
    };
    let Some(target_id) = non_empty(raw.target_id) else {
        diagnostics.push(invalid("missing target_id"));
        return None;
    };
    let Some(relation_type) = non_empty(raw.relation_type) else {
        diagnostics.push(invalid("missing relation_type"));
        return None;
    };
    let Some(claim_type) = raw.claim_type.as_deref().and_then(ClaimType::parse) else {
        let found = raw.claim_type.unwrap_or_else(|| "nothing".into());
        diagnostics.push(Diagnostic::InvalidRelation {
            relation_index,
            reason: format!("claim_type must be fact or argument, found {found}"),
        });
        return None;
    };

    let mut relation = Relation::new(
        source_id,
        target_id,
        normalize_relation_type(&relation_type),
        claim_type,
    )
    .with_confidence(raw.confidence.unwrap_or(1.0));
    relation.properties = raw.properties.unwrap_or_default();
    Some(relation)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WRAPPED: &str = r#"{
        "work_schema_metadata": {
            "interpretation_layer": {
                "nodes": [
                    {"id": "w1", "type": "work", "name": "Work A", "confidence": 0.9},
                    {"id": "p1", "type": "person", "name": "Jane Doe"}
                ],
                "relations": [
                    {"source_id": "w1", "target_id": "p1", "relation_type": "created_by",
                     "confidence": 0.8, "claim_type": "established_fact",
                     "properties": {"evidence": "colophon"}}
                ]
            }
        }
    }"#;

    #[test]
    fn test_wrapped_payload() {
        let input = GraphInput::from_json(WRAPPED).unwrap();

        assert_eq!(input.nodes().len(), 2);
        assert_eq!(input.relations().len(), 1);
        assert!(input.diagnostics().is_empty());

        let rel = &input.relations()[0].relation;
        assert_eq!(rel.claim_type, ClaimType::Fact);
        assert_eq!(rel.properties["evidence"], "colophon");
        assert_eq!(input.node("p1").unwrap().confidence, 1.0);
    }

    #[test]
    fn test_bare_payload() {
        let input = GraphInput::from_json(
            r#"{"nodes": [{"id": "d1", "type": "date", "name": "1300"}], "relations": []}"#,
        )
        .unwrap();

        assert_eq!(input.node("d1").unwrap().entity_type, EntityType::Date);
    }

    #[test]
    fn test_rejects_non_object() {
        let err = GraphInput::from_json("[1, 2, 3]").unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[test]
    fn test_bad_records_become_diagnostics() {
        let input = GraphInput::from_json(
            r#"{
                "nodes": [
                    {"id": "a", "type": "person", "name": "A"},
                    {"id": "a", "type": "person", "name": "A again"},
                    {"id": "s", "type": "spaceship", "name": "Nostromo"},
                    {"type": "place", "name": "Nowhere"}
                ],
                "relations": [
                    {"source_id": "a", "target_id": "a", "relation_type": "lived_in", "claim_type": "interpretation"},
                    {"source_id": "a", "relation_type": "lived_in", "claim_type": "fact"},
                    {"source_id": "a", "target_id": "x", "relation_type": "lived_in", "claim_type": "fact"}
                ]
            }"#,
        )
        .unwrap();

        let kinds: Vec<_> = input.diagnostics().iter().map(|d| d.kind_name()).collect();
        assert!(kinds.contains(&"duplicate_node"));
        assert!(kinds.contains(&"unknown_entity_type"));
        assert!(kinds.contains(&"invalid_node"));
        assert_eq!(kinds.iter().filter(|k| **k == "invalid_relation").count(), 2);

        assert_eq!(input.nodes().len(), 1);
        assert_eq!(input.node("a").unwrap().name, "A");
        // Readable relation keeps its payload position
        assert_eq!(input.relations().len(), 1);
        assert_eq!(input.relations()[0].index, 2);
    }

    #[test]
    fn test_mistyped_fields_reject_only_their_record() {
        let input = GraphInput::from_json(
            r#"{
                "nodes": [
                    {"id": "w1", "type": "work", "name": "Work A"},
                    {"id": "p1", "type": "person", "name": "Jane Doe", "confidence": "sure"},
                    "p2"
                ],
                "relations": [
                    {"source_id": "w1", "target_id": "p1", "relation_type": "created_by", "claim_type": "fact"},
                    {"source_id": "w1", "target_id": "p1", "relation_type": "created_by",
                     "claim_type": "fact", "confidence": "high"},
                    {"source_id": 7, "target_id": "p1", "relation_type": "created_by", "claim_type": "fact"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(input.nodes().len(), 1);
        assert_eq!(input.relations().len(), 1);
        assert_eq!(input.relations()[0].index, 0);

        let invalid: Vec<_> = input
            .diagnostics()
            .iter()
            .map(|d| (d.kind_name(), d.relation_index()))
            .collect();
        assert_eq!(
            invalid,
            [
                ("invalid_node", None),
                ("invalid_node", None),
                ("invalid_relation", Some(1)),
                ("invalid_relation", Some(2)),
            ]
        );
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let input = GraphInput::from_json(r#"{"nodes": null, "relations": null}"#).unwrap();

        assert!(input.nodes().is_empty());
        assert!(input.relations().is_empty());
        assert!(input.diagnostics().is_empty());
    }

    #[test]
    fn test_new_indexes_relations_by_position() {
        let input = GraphInput::new(
            vec![Node::new("p1", EntityType::Person, "Jane")],
            vec![
                Relation::new("p1", "x", "lived_in", ClaimType::Fact),
                Relation::new("p1", "y", "lived_in", ClaimType::Argument),
            ],
        );

        assert_eq!(input.relations()[1].index, 1);
        assert_eq!(input.node_position("p1"), Some(0));
        assert!(input.node("x").is_none());
    }
}
