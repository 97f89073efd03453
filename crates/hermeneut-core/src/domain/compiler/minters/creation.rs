use crate::domain::graph::Diagnostic;
use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::EventGroup;
use super::super::record::EventKey;
use super::{EventMinter, MintContext};

/// One Creation event per work
///
/// `created_by` is the required role. A group without it can only amend a
/// Creation event that already exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreationMinter;

impl EventMinter for CreationMinter {
    fn category(&self) -> EventCategory {
        EventCategory::Creation
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        let group_key = group.key.to_string();
        let Some(work) = cx.iri(group.central()) else {
            return;
        };
        let key = EventKey::creation(&work);

        let position = if group.of_type("created_by").next().is_some() {
            cx.open_event(key, &group_key)
        } else {
            match cx.existing_event(&key, &group_key) {
                Some(position) => position,
                None => {
                    cx.report(Diagnostic::incomplete_event(
                        group_key,
                        EventCategory::Creation.as_str(),
                        "creator",
                        group.relations.iter().map(|r| r.index),
                    ));
                    return;
                }
            }
        };

        for relation in &group.relations {
            let Some(target) = cx.iri(relation.target_id()) else {
                continue;
            };
            let predicate = match relation.relation_type() {
                "created_by" => {
                    cx.registry.record_creator(&target, &work);
                    Property::CarriedOutBy
                }
                "created_during" => Property::HasTimeSpan,
                "created_in" | "created_at" => Property::TookPlaceAt,
                _ => {
                    cx.unsupported(relation);
                    continue;
                }
            };
            cx.add_edge(position, predicate, &target, &group_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::compiler::fixtures::{argument, compile, fact};
    use crate::domain::compiler::record::EventKey;
    use crate::domain::graph::{EntityType, Node};
    use crate::domain::ontology::Property;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("w1", EntityType::Work, "Work A"),
            Node::new("p1", EntityType::Person, "Jane Doe"),
            Node::new("p2", EntityType::Person, "John Roe"),
            Node::new("d1", EntityType::Date, "1300"),
            Node::new("pl1", EntityType::Place, "Ghent"),
        ]
    }

    #[test]
    fn test_full_creation_group() {
        let graph = compile(
            nodes(),
            vec![
                fact("w1", "p1", "created_by"),
                fact("w1", "d1", "created_during"),
                fact("w1", "pl1", "created_in"),
                fact("w1", "p2", "created_by"),
            ],
        );
        let record = graph.facts.buffer.event_for(&EventKey::creation("work_a")).unwrap();

        assert_eq!(record.iri, "work_a_creation");
        assert!(record.has_edge(Property::HasCreated, "work_a"));
        assert!(record.has_edge(Property::CarriedOutBy, "jane_doe"));
        assert!(record.has_edge(Property::CarriedOutBy, "john_roe"));
        assert!(record.has_edge(Property::HasTimeSpan, "1300"));
        assert!(record.has_edge(Property::TookPlaceAt, "ghent"));
        assert_eq!(graph.facts.buffer.events().len(), 1);
    }

    #[test]
    fn test_creator_less_group_is_skipped() {
        let graph = compile(nodes(), vec![fact("w1", "d1", "created_during")]);

        assert!(graph.facts.buffer.events().is_empty());
        assert!(
            graph
                .diagnostics
                .iter()
                .any(|d| d.kind_name() == "incomplete_event_data")
        );
        assert_eq!(graph.stats.relations_compiled, 0);
        assert_eq!(graph.stats.relations_dropped, 1);
    }

    #[test]
    fn test_creator_less_argument_amends_fact_event() {
        let graph = compile(
            nodes(),
            vec![
                fact("w1", "p1", "created_by"),
                argument("w1", "d1", "created_during"),
            ],
        );

        let amendment = graph
            .arguments
            .buffer
            .event_for(&EventKey::creation("work_a"))
            .unwrap();
        assert!(!amendment.declared);
        assert_eq!(amendment.iri, "work_a_creation");
        assert!(amendment.has_edge(Property::HasTimeSpan, "1300"));
        assert!(graph.diagnostics.is_empty());
    }
}
