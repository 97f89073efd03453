use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::super::record::{EventKey, EventKind};
use super::{EventMinter, MintContext};

/// E67_Birth with P98 and optional time-span and place
#[derive(Debug, Clone, Copy, Default)]
pub struct BirthMinter;

/// E69_Death with P100 and optional time-span and place
#[derive(Debug, Clone, Copy, Default)]
pub struct DeathMinter;

impl EventMinter for BirthMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonBirth
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        mint_life_event(EventKind::Birth, group, cx);
    }
}

impl EventMinter for DeathMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonDeath
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        mint_life_event(EventKind::Death, group, cx);
    }
}

fn mint_life_event(kind: EventKind, group: &EventGroup, cx: &mut MintContext<'_>) {
    let group_key = group.key.to_string();
    let Some(person) = cx.iri(group.central()) else {
        return;
    };
    let position = cx.open_event(EventKey::new(kind, person), &group_key);

    for relation in &group.relations {
        let Some(target) = cx.iri(relation.target_id()) else {
            continue;
        };
        let predicate = match relation.relation_type() {
            "date_of_birth" | "date_of_death" => Property::HasTimeSpan,
            "place_of_birth" | "place_of_death" => Property::TookPlaceAt,
            _ => {
                cx.unsupported(relation);
                continue;
            }
        };
        cx.add_edge(position, predicate, &target, &group_key);
    }
}
