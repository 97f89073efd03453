use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::{EventMinter, MintContext};

/// `lived_in`: direct residence edge
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidenceMinter;

/// Genre, theme, characteristic and language of a work: direct edges
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkClassificationMinter;

impl EventMinter for ResidenceMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonResidence
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        for relation in &group.relations {
            if let Some((person, place)) = cx.endpoints(relation) {
                cx.statement(&person, Property::HasResidence, &place);
            }
        }
    }
}

impl EventMinter for WorkClassificationMinter {
    fn category(&self) -> EventCategory {
        EventCategory::WorkClassification
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        for relation in &group.relations {
            let Some((work, target)) = cx.endpoints(relation) else {
                continue;
            };
            let predicate = match relation.relation_type() {
                "has_genre" | "has_characteristic" => Property::HasType,
                "has_theme" => Property::IsAbout,
                "written_in_language" => Property::HasLanguage,
                _ => {
                    cx.unsupported(relation);
                    continue;
                }
            };
            cx.statement(&work, predicate, &target);
        }
    }
}
