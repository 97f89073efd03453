use tracing::debug;

use crate::domain::graph::EntityType;
use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::{EventMinter, MintContext};

/// `associated_with` / `refers_to`
///
/// Only two shapes are emitted: membership of a person in an organization,
/// and a work referring to something. Everything else is reported and
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssociationMinter;

impl EventMinter for AssociationMinter {
    fn category(&self) -> EventCategory {
        EventCategory::Association
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        for relation in &group.relations {
            let Some((source, target)) = cx.endpoints(relation) else {
                continue;
            };
            match (
                relation.relation_type(),
                relation.source_type,
                relation.target_type,
            ) {
                ("associated_with", EntityType::Person, EntityType::Organization) => {
                    cx.statement(&target, Property::HasMember, &source)
                }
                ("associated_with" | "refers_to", EntityType::Work, _) => {
                    cx.statement(&source, Property::RefersTo, &target)
                }
                (relation_type, source_type, target_type) => {
                    debug!(
                        relation_index = relation.index,
                        relation_type = %relation_type,
                        source_type = %source_type,
                        target_type = %target_type,
                        "Association shape not emitted"
                    );
                    cx.unsupported(relation);
                }
            }
        }
    }
}
