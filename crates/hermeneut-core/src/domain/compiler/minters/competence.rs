use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::{EventMinter, MintContext};

/// `speaks_language`: the person has type "<Language> Speaker"
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageMinter;

/// `has_expertise_in`: the person has type "Expert in <Value>"
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpertiseMinter;

impl EventMinter for LanguageMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonLanguage
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        mint_classification(group, cx, |iri, name| {
            (
                format!("speaker:{iri}"),
                format!("{iri}_speaker"),
                format!("{name} Speaker"),
            )
        });
    }
}

impl EventMinter for ExpertiseMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonExpertise
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        mint_classification(group, cx, |iri, name| {
            (
                format!("expert:{iri}"),
                format!("expert_in_{iri}"),
                format!("Expert in {name}"),
            )
        });
    }
}

/// `naming(value iri, value name)` gives (registry key, base name, label)
fn mint_classification(
    group: &EventGroup,
    cx: &mut MintContext<'_>,
    naming: impl Fn(&str, &str) -> (String, String, String),
) {
    for relation in &group.relations {
        let Some((person, value)) = cx.endpoints(relation) else {
            continue;
        };
        let Some(node) = cx.node(relation.target_id()) else {
            continue;
        };
        let (key, base, label) = naming(&value, &node.name);
        let classification = cx.classification(&key, &base, label);
        cx.statement(&person, Property::HasType, &classification);
    }
}
