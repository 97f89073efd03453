//! Compile diagnostics
//!
//! Everything that goes wrong with a single node, relation or event group is
//! recorded here instead of aborting the batch. A document with partial data
//! still yields a partial, valid graph plus this list.

use serde::{Deserialize, Serialize};

use super::entity::EntityType;

/// How much a diagnostic matters to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Something was repaired; nothing was lost
    Info,
    /// Something was dropped from the output
    Warning,
}

/// A non-fatal problem found while compiling one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A second node reused an id; the first one wins
    DuplicateNode { node_id: String },
    /// A node could not be read (missing id or name)
    InvalidNode { node_index: usize, reason: String },
    /// A node's type is outside the fixed entity-type set
    UnknownEntityType { node_id: String, entity_type: String },
    /// A relation could not be read (empty field, bad claim type)
    InvalidRelation { relation_index: usize, reason: String },
    /// A relation points to an id that is not a valid node
    MissingReference {
        relation_index: usize,
        relation_type: String,
        missing_id: String,
    },
    /// A relation's confidence is under the configured floor
    BelowConfidence {
        relation_index: usize,
        confidence: f32,
        threshold: f32,
    },
    /// A relation type has no event category
    UnclassifiedRelationType {
        relation_index: usize,
        relation_type: String,
    },
    /// Neither orientation satisfies the domain/range table
    PolarityViolation {
        relation_index: usize,
        relation_type: String,
        source_type: EntityType,
        target_type: EntityType,
        reason: String,
    },
    /// Source and target were swapped to satisfy the domain/range table
    PolarityCorrected {
        relation_index: usize,
        relation_type: String,
    },
    /// A required role of an event category is missing; the group was skipped
    IncompleteEventData {
        group_key: String,
        category: String,
        missing_role: String,
        /// Relations of the skipped group
        relation_indices: Vec<usize>,
    },
    /// A minter does not handle this subject/object combination
    UnsupportedShape {
        relation_index: usize,
        relation_type: String,
        source_type: EntityType,
        target_type: EntityType,
    },
}

impl Diagnostic {
    /// Get the diagnostic kind name
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::DuplicateNode { .. } => "duplicate_node",
            Self::InvalidNode { .. } => "invalid_node",
            Self::UnknownEntityType { .. } => "unknown_entity_type",
            Self::InvalidRelation { .. } => "invalid_relation",
            Self::MissingReference { .. } => "missing_reference",
            Self::BelowConfidence { .. } => "below_confidence",
            Self::UnclassifiedRelationType { .. } => "unclassified_relation_type",
            Self::PolarityViolation { .. } => "polarity_violation",
            Self::PolarityCorrected { .. } => "polarity_corrected",
            Self::IncompleteEventData { .. } => "incomplete_event_data",
            Self::UnsupportedShape { .. } => "unsupported_shape",
        }
    }

    /// Get the stable diagnostic code
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateNode { .. } => "D001",
            Self::UnknownEntityType { .. } => "D002",
            Self::InvalidNode { .. } => "D004",
            Self::InvalidRelation { .. } => "D003",
            Self::MissingReference { .. } => "D100",
            Self::BelowConfidence { .. } => "D101",
            Self::UnclassifiedRelationType { .. } => "D102",
            Self::PolarityViolation { .. } => "D200",
            Self::PolarityCorrected { .. } => "D201",
            Self::IncompleteEventData { .. } => "D300",
            Self::UnsupportedShape { .. } => "D301",
        }
    }

    /// Get the severity
    pub fn severity(&self) -> Severity {
        match self {
            Self::PolarityCorrected { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Index of the offending relation in the input payload, if any
    pub fn relation_index(&self) -> Option<usize> {
        match self {
            Self::InvalidRelation { relation_index, .. }
            | Self::MissingReference { relation_index, .. }
            | Self::BelowConfidence { relation_index, .. }
            | Self::UnclassifiedRelationType { relation_index, .. }
            | Self::PolarityViolation { relation_index, .. }
            | Self::PolarityCorrected { relation_index, .. }
            | Self::UnsupportedShape { relation_index, .. } => Some(*relation_index),
            Self::DuplicateNode { .. }
            | Self::InvalidNode { .. }
            | Self::UnknownEntityType { .. }
            | Self::IncompleteEventData { .. } => None,
        }
    }

    /// Every input relation this diagnostic covers
    ///
    /// A skipped group covers all of its members.
    pub fn relation_indices(&self) -> Vec<usize> {
        match self {
            Self::IncompleteEventData {
                relation_indices, ..
            } => relation_indices.clone(),
            _ => self.relation_index().into_iter().collect(),
        }
    }

    /// Create a new PolarityViolation diagnostic
    pub fn polarity_violation(
        relation_index: usize,
        relation_type: impl Into<String>,
        source_type: EntityType,
        target_type: EntityType,
    ) -> Self {
        let relation_type = relation_type.into();
        let reason = format!(
            "{relation_type} does not accept ({source_type}, {target_type}) in either direction"
        );
        Self::PolarityViolation {
            relation_index,
            relation_type,
            source_type,
            target_type,
            reason,
        }
    }

    /// Create a new IncompleteEventData diagnostic
    pub fn incomplete_event(
        group_key: impl Into<String>,
        category: impl Into<String>,
        missing_role: impl Into<String>,
        relation_indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self::IncompleteEventData {
            group_key: group_key.into(),
            category: category.into(),
            missing_role: missing_role.into(),
            relation_indices: relation_indices.into_iter().collect(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNode { node_id } => write!(f, "duplicate node id '{node_id}'"),
            Self::InvalidNode { node_index, reason } => {
                write!(f, "node #{node_index} is invalid: {reason}")
            }
            Self::UnknownEntityType {
                node_id,
                entity_type,
            } => write!(f, "node '{node_id}' has unknown type '{entity_type}'"),
            Self::InvalidRelation {
                relation_index,
                reason,
            } => write!(f, "relation #{relation_index} is invalid: {reason}"),
            Self::MissingReference {
                relation_index,
                relation_type,
                missing_id,
            } => write!(
                f,
                "relation #{relation_index} ({relation_type}) references unknown node '{missing_id}'"
            ),
            Self::BelowConfidence {
                relation_index,
                confidence,
                threshold,
            } => write!(
                f,
                "relation #{relation_index} confidence {confidence:.2} is below {threshold:.2}"
            ),
            Self::UnclassifiedRelationType {
                relation_index,
                relation_type,
            } => write!(
                f,
                "relation #{relation_index} has unclassified type '{relation_type}'"
            ),
            Self::PolarityViolation {
                relation_index,
                reason,
                ..
            } => write!(f, "relation #{relation_index} dropped: {reason}"),
            Self::PolarityCorrected {
                relation_index,
                relation_type,
            } => write!(
                f,
                "relation #{relation_index} ({relation_type}) had its direction swapped"
            ),
            Self::IncompleteEventData {
                group_key,
                missing_role,
                ..
            } => write!(f, "group '{group_key}' skipped: missing {missing_role}"),
            Self::UnsupportedShape {
                relation_index,
                relation_type,
                source_type,
                target_type,
            } => write!(
                f,
                "relation #{relation_index} ({relation_type}) from {source_type} to {target_type} is not emitted"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_violation_reason_names_types() {
        let diag = Diagnostic::polarity_violation(
            3,
            "influenced_by",
            EntityType::Date,
            EntityType::Language,
        );

        assert_eq!(diag.kind_name(), "polarity_violation");
        assert_eq!(diag.relation_index(), Some(3));
        assert_eq!(diag.severity(), Severity::Warning);
        let Diagnostic::PolarityViolation { reason, .. } = &diag else {
            panic!("expected polarity violation");
        };
        assert!(reason.contains("date"));
        assert!(reason.contains("language"));
    }

    #[test]
    fn test_incomplete_event() {
        let diag = Diagnostic::incomplete_event("creation_w1", "creation", "creator", [2, 5]);

        assert_eq!(diag.code(), "D300");
        assert_eq!(diag.relation_index(), None);
        assert_eq!(diag.relation_indices(), [2, 5]);
        assert!(diag.to_string().contains("creation_w1"));
    }

    #[test]
    fn test_corrected_is_informational() {
        let diag = Diagnostic::PolarityCorrected {
            relation_index: 0,
            relation_type: "created_by".into(),
        };
        assert_eq!(diag.severity(), Severity::Info);
    }

    #[test]
    fn test_tagged_serialization() {
        let diag = Diagnostic::MissingReference {
            relation_index: 1,
            relation_type: "created_by".into(),
            missing_id: "ghost".into(),
        };
        let json = serde_json::to_value(&diag).unwrap();

        assert_eq!(json["kind"], "missing_reference");
        assert_eq!(json["missing_id"], "ghost");
    }
}
