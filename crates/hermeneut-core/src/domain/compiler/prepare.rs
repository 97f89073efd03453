//! Relation preparation
//!
//! Runs once per document, before either pass. Every relation is checked in
//! order (references, confidence floor, category, direction) and either
//! survives in its corrected direction or leaves exactly one diagnostic.

use tracing::{debug, info};

use crate::domain::graph::{ClaimType, Diagnostic, GraphInput};

use super::CompileOptions;
use super::classifier::EventClassifier;
use super::grouper::PreparedRelation;
use super::polarity::{Polarity, PolarityCorrector};

/// Surviving relations split by partition
#[derive(Debug, Default)]
pub struct Preparation {
    pub facts: Vec<PreparedRelation>,
    pub arguments: Vec<PreparedRelation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Preparation {
    /// Every surviving relation, facts first
    pub fn all(&self) -> impl Iterator<Item = &PreparedRelation> {
        self.facts.iter().chain(self.arguments.iter())
    }
}

pub fn prepare(
    input: &GraphInput,
    classifier: &EventClassifier,
    corrector: &PolarityCorrector,
    options: &CompileOptions,
) -> Preparation {
    let mut out = Preparation::default();

    for item in input.relations() {
        let relation = &item.relation;
        let index = item.index;

        let (source, target) = match (
            input.node(&relation.source_id),
            input.node(&relation.target_id),
        ) {
            (Some(source), Some(target)) => (source, target),
            (source, _) => {
                let missing_id = if source.is_none() {
                    &relation.source_id
                } else {
                    &relation.target_id
                };
                out.diagnostics.push(Diagnostic::MissingReference {
                    relation_index: index,
                    relation_type: relation.relation_type.clone(),
                    missing_id: missing_id.clone(),
                });
                continue;
            }
        };

        if relation.confidence < options.min_confidence {
            out.diagnostics.push(Diagnostic::BelowConfidence {
                relation_index: index,
                confidence: relation.confidence,
                threshold: options.min_confidence,
            });
            continue;
        }

        let Some(category) = classifier.classify(&relation.relation_type) else {
            debug!(relation_index = index, relation_type = %relation.relation_type, "Unclassified relation type");
            out.diagnostics.push(Diagnostic::UnclassifiedRelationType {
                relation_index: index,
                relation_type: relation.relation_type.clone(),
            });
            continue;
        };

        let prepared = match corrector.check(&relation.relation_type, source.entity_type, target.entity_type) {
            Polarity::Unconstrained | Polarity::Valid => PreparedRelation {
                index,
                relation: relation.clone(),
                category,
                source_type: source.entity_type,
                target_type: target.entity_type,
            },
            Polarity::Reversed => {
                debug!(relation_index = index, relation_type = %relation.relation_type, "Swapped relation direction");
                out.diagnostics.push(Diagnostic::PolarityCorrected {
                    relation_index: index,
                    relation_type: relation.relation_type.clone(),
                });
                PreparedRelation {
                    index,
                    relation: relation.reversed(),
                    category,
                    source_type: target.entity_type,
                    target_type: source.entity_type,
                }
            }
            Polarity::Invalid => {
                out.diagnostics.push(Diagnostic::polarity_violation(
                    index,
                    relation.relation_type.clone(),
                    source.entity_type,
                    target.entity_type,
                ));
                continue;
            }
        };

        match relation.claim_type {
            ClaimType::Fact => out.facts.push(prepared),
            ClaimType::Argument => out.arguments.push(prepared),
        }
    }

    info!(
        facts = out.facts.len(),
        arguments = out.arguments.len(),
        diagnostics = out.diagnostics.len(),
        "Prepared relations"
    );
    out
}
