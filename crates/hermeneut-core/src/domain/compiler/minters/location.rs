use crate::domain::graph::EntityType;
use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::super::record::EventKey;
use super::{EventMinter, MintContext};

/// `located_in_time` / `located_in_space`
///
/// A work is located through its Creation event; people and organizations
/// get direct edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationMinter;

impl EventMinter for LocationMinter {
    fn category(&self) -> EventCategory {
        EventCategory::Location
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        let group_key = group.key.to_string();
        for relation in &group.relations {
            let Some((source, target)) = cx.endpoints(relation) else {
                continue;
            };
            match (relation.relation_type(), relation.source_type) {
                ("located_in_time", _) => cx.statement(&source, Property::HasTimeSpan, &target),
                ("located_in_space", EntityType::Person | EntityType::Organization) => {
                    cx.statement(&source, Property::HasLocation, &target)
                }
                ("located_in_space", EntityType::Work) => {
                    let position = cx.open_event(EventKey::creation(&source), &group_key);
                    cx.add_edge(position, Property::TookPlaceAt, &target, &group_key);
                }
                _ => cx.unsupported(relation),
            }
        }
    }
}
