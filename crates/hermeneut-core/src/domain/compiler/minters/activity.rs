use crate::domain::graph::EntityType;
use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::super::record::{EventKey, EventKind};
use super::{EventMinter, MintContext};

/// `has_occupation`: one E7_Activity per (person, occupation)
#[derive(Debug, Clone, Copy, Default)]
pub struct OccupationMinter;

/// `has_role`: one E7_Activity per (person, role), typed by the role
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleMinter;

/// `educated_at`: one E7_Activity per (person, institution or place)
#[derive(Debug, Clone, Copy, Default)]
pub struct EducationMinter;

impl EventMinter for OccupationMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonOccupation
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        let group_key = group.key.to_string();
        for relation in &group.relations {
            let Some((person, occupation)) = cx.endpoints(relation) else {
                continue;
            };
            let Some(node) = cx.node(relation.target_id()) else {
                continue;
            };
            let key = EventKey::new(EventKind::Occupation, &person).with_qualifier(&occupation);
            let base = format!("{person}_{occupation}_activity");
            cx.open_event_named(key, &base, Some(node.name.clone()), &group_key);
        }
    }
}

impl EventMinter for RoleMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonRole
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        let group_key = group.key.to_string();
        for relation in &group.relations {
            let Some((person, role)) = cx.endpoints(relation) else {
                continue;
            };
            let key = EventKey::new(EventKind::Role, &person).with_qualifier(&role);
            let base = format!("{person}_{role}_role");
            let position = cx.open_event_named(key, &base, None, &group_key);
            cx.add_edge(position, Property::HasType, &role, &group_key);
        }
    }
}

impl EventMinter for EducationMinter {
    fn category(&self) -> EventCategory {
        EventCategory::PersonEducation
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        let group_key = group.key.to_string();
        for relation in &group.relations {
            let Some((person, target)) = cx.endpoints(relation) else {
                continue;
            };
            let Some(node) = cx.node(relation.target_id()) else {
                continue;
            };
            let predicate = match relation.target_type {
                EntityType::Organization => Property::CarriedOutBy,
                EntityType::Place => Property::TookPlaceAt,
                _ => {
                    cx.unsupported(relation);
                    continue;
                }
            };
            let key = EventKey::new(EventKind::Education, &person).with_qualifier(&target);
            let base = format!("{person}_education_{target}");
            let label = format!("Education at {}", node.name);
            let position = cx.open_event_named(key, &base, Some(label), &group_key);
            cx.add_edge(position, predicate, &target, &group_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::compiler::fixtures::{argument, compile, fact};
    use crate::domain::compiler::record::{EventKey, EventKind};
    use crate::domain::graph::{EntityType, Node};
    use crate::domain::ontology::Property;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("p1", EntityType::Person, "Jane Doe"),
            Node::new("o1", EntityType::Occupation, "Monk"),
            Node::new("r1", EntityType::Role, "Scribe"),
            Node::new("u1", EntityType::Organization, "University of Paris"),
            Node::new("pl1", EntityType::Place, "Ghent"),
        ]
    }

    #[test]
    fn test_occupation_activity() {
        let graph = compile(
            nodes(),
            vec![
                fact("p1", "o1", "has_occupation"),
                fact("p1", "r1", "has_occupation"),
            ],
        );
        let buffer = &graph.facts.buffer;

        let monk = buffer
            .event_for(&EventKey::new(EventKind::Occupation, "jane_doe").with_qualifier("monk"))
            .unwrap();
        assert_eq!(monk.iri, "jane_doe_monk_activity");
        assert!(monk.has_edge(Property::CarriedOutBy, "jane_doe"));
        assert_eq!(monk.appellation.as_ref().unwrap().label, "Monk");
        assert_eq!(buffer.events().len(), 2);
        assert!(graph.facts.turtle.contains("ex:jane_doe_scribe_activity a crm:E7_Activity ;"));
    }

    #[test]
    fn test_occupation_is_idempotent_across_partitions() {
        let graph = compile(
            nodes(),
            vec![
                fact("p1", "o1", "has_occupation"),
                argument("p1", "o1", "has_occupation"),
            ],
        );

        assert_eq!(graph.facts.buffer.minted_count(), 1);
        assert_eq!(graph.arguments.buffer.minted_count(), 0);
        assert_eq!(graph.arguments.turtle, "");
    }

    #[test]
    fn test_role_activity() {
        let graph = compile(nodes(), vec![fact("r1", "p1", "has_role")]);
        let buffer = &graph.facts.buffer;

        let role = buffer
            .event_for(&EventKey::new(EventKind::Role, "jane_doe").with_qualifier("scribe"))
            .unwrap();
        assert_eq!(role.iri, "jane_doe_scribe_role");
        assert!(role.has_edge(Property::CarriedOutBy, "jane_doe"));
        assert!(role.has_edge(Property::HasType, "scribe"));
        assert!(graph.facts.turtle.contains(
            "ex:jane_doe_scribe_role a crm:E7_Activity ;\n    crm:P14_carried_out_by ex:jane_doe ;\n    crm:P2_has_type ex:scribe ."
        ));
        assert_eq!(graph.stats.relations_dropped, 0);
    }

    #[test]
    fn test_role_needs_role_target() {
        let graph = compile(nodes(), vec![fact("p1", "o1", "has_role")]);

        assert!(graph.facts.buffer.events().is_empty());
        assert_eq!(graph.diagnostics[0].kind_name(), "polarity_violation");
    }

    #[test]
    fn test_education_at_organization_and_place() {
        let graph = compile(
            nodes(),
            vec![
                fact("p1", "u1", "educated_at"),
                fact("p1", "pl1", "educated_at"),
            ],
        );
        let buffer = &graph.facts.buffer;

        let university = buffer
            .event_for(
                &EventKey::new(EventKind::Education, "jane_doe").with_qualifier("university_of_paris"),
            )
            .unwrap();
        assert_eq!(university.iri, "jane_doe_education_university_of_paris");
        assert!(university.has_edge(Property::HadParticipant, "jane_doe"));
        assert!(university.has_edge(Property::CarriedOutBy, "university_of_paris"));
        assert_eq!(
            university.appellation.as_ref().unwrap().label,
            "Education at University of Paris"
        );

        assert!(buffer.has_triple("jane_doe_education_ghent", Property::TookPlaceAt, "ghent"));
    }
}
