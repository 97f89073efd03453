use tracing::debug;

use crate::domain::compiler::UnresolvedInfluence;
use crate::domain::graph::{Diagnostic, EntityType};
use crate::domain::ontology::Property;

use super::super::classifier::EventCategory;
use super::super::grouper::{EventGroup, PreparedRelation};
use super::super::record::EventKey;
use super::{EventMinter, MintContext};

/// `influenced_by`, redirected onto Creation events where possible
///
/// Runs after every other category of the pass, so any Creation event it can
/// attach to is already open.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfluenceMinter;

impl EventMinter for InfluenceMinter {
    fn category(&self) -> EventCategory {
        EventCategory::Influence
    }

    fn mint(&self, group: &EventGroup, cx: &mut MintContext<'_>) {
        let group_key = group.key.to_string();
        for relation in &group.relations {
            let Some((source, target)) = cx.endpoints(relation) else {
                continue;
            };
            match relation.source_type {
                EntityType::Work => {
                    from_work(relation, &source, &target, &group_key, cx);
                }
                EntityType::Person => {
                    from_person(&source, &target, &group_key, cx);
                }
                _ => cx.unsupported(relation),
            }
        }
    }
}

fn from_work(
    relation: &PreparedRelation,
    work: &str,
    target: &str,
    group_key: &str,
    cx: &mut MintContext<'_>,
) {
    let key = EventKey::creation(work);
    let position = match cx.existing_event(&key, group_key) {
        Some(position) => position,
        None => match cx.options.unresolved_influence {
            UnresolvedInfluence::Stub => {
                debug!(work = %work, relation_index = relation.index, "Minting creation stub for influence");
                cx.open_event(key, group_key)
            }
            UnresolvedInfluence::Drop => {
                cx.report(Diagnostic::incomplete_event(
                    group_key,
                    EventCategory::Influence.as_str(),
                    "creation event",
                    [relation.index],
                ));
                return;
            }
        },
    };
    cx.add_edge(position, Property::WasInfluencedBy, target, group_key);
}

/// A creator's influences are influences on each of their creations
fn from_person(person: &str, target: &str, group_key: &str, cx: &mut MintContext<'_>) {
    let works = cx.registry.works_created_by(person).to_vec();
    let mut attached = false;
    for work in works {
        if let Some(position) = cx.existing_event(&EventKey::creation(work), group_key) {
            cx.add_edge(position, Property::WasInfluencedBy, target, group_key);
            attached = true;
        }
    }
    if !attached {
        cx.statement(person, Property::WasInfluencedBy, target);
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::compiler::fixtures::{argument, compile, compile_with, fact};
    use crate::domain::compiler::record::EventKey;
    use crate::domain::compiler::{CompileOptions, UnresolvedInfluence};
    use crate::domain::graph::{EntityType, Node};
    use crate::domain::ontology::Property;

    fn nodes() -> Vec<Node> {
        vec![
            Node::new("w1", EntityType::Work, "Work A"),
            Node::new("w2", EntityType::Work, "Work B"),
            Node::new("p1", EntityType::Person, "Jane Doe"),
            Node::new("p2", EntityType::Person, "Chrétien"),
            Node::new("c1", EntityType::Concept, "Courtly love"),
        ]
    }

    #[test]
    fn test_creator_influence_moves_to_creation() {
        let graph = compile(
            nodes(),
            vec![
                fact("p1", "p2", "influenced_by"),
                fact("w1", "p1", "created_by"),
            ],
        );
        let buffer = &graph.facts.buffer;

        assert!(buffer.has_triple("work_a_creation", Property::WasInfluencedBy, "chr_tien"));
        assert!(!buffer.has_triple("jane_doe", Property::WasInfluencedBy, "chr_tien"));
    }

    #[test]
    fn test_creator_of_several_works() {
        let graph = compile(
            nodes(),
            vec![
                fact("w1", "p1", "created_by"),
                fact("w2", "p1", "created_by"),
                fact("p1", "c1", "influenced_by"),
            ],
        );
        let buffer = &graph.facts.buffer;

        assert!(buffer.has_triple("work_a_creation", Property::WasInfluencedBy, "courtly_love"));
        assert!(buffer.has_triple("work_b_creation", Property::WasInfluencedBy, "courtly_love"));
    }

    #[test]
    fn test_person_without_works_keeps_direct_edge() {
        let graph = compile(nodes(), vec![fact("p2", "c1", "influenced_by")]);

        assert!(graph.facts.buffer.has_triple("chr_tien", Property::WasInfluencedBy, "courtly_love"));
    }

    #[test]
    fn test_work_influence_attaches_to_creation() {
        let graph = compile(
            nodes(),
            vec![
                fact("w1", "c1", "influenced_by"),
                fact("w1", "p1", "created_by"),
            ],
        );
        let record = graph.facts.buffer.event_for(&EventKey::creation("work_a")).unwrap();

        assert!(record.has_edge(Property::WasInfluencedBy, "courtly_love"));
        assert!(record.has_edge(Property::CarriedOutBy, "jane_doe"));
        assert_eq!(graph.facts.buffer.events().len(), 1);
    }

    #[test]
    fn test_unresolved_work_influence_stub() {
        let graph = compile(nodes(), vec![fact("w2", "c1", "influenced_by")]);
        let record = graph.facts.buffer.event_for(&EventKey::creation("work_b")).unwrap();

        assert!(record.declared);
        assert!(record.has_edge(Property::HasCreated, "work_b"));
        assert!(record.has_edge(Property::WasInfluencedBy, "courtly_love"));
    }

    #[test]
    fn test_unresolved_work_influence_drop() {
        let options = CompileOptions {
            unresolved_influence: UnresolvedInfluence::Drop,
            ..CompileOptions::default()
        };
        let graph = compile_with(options, nodes(), vec![fact("w2", "c1", "influenced_by")]);

        assert!(graph.facts.buffer.events().is_empty());
        assert!(
            !graph
                .facts
                .buffer
                .has_triple("work_b", Property::WasInfluencedBy, "courtly_love")
        );
        assert!(
            graph
                .diagnostics
                .iter()
                .any(|d| d.kind_name() == "incomplete_event_data")
        );
        assert_eq!(graph.stats.relations_dropped, 1);
    }

    #[test]
    fn test_argument_influence_amends_fact_creation() {
        let graph = compile(
            nodes(),
            vec![
                fact("w1", "p1", "created_by"),
                argument("p1", "p2", "influenced_by"),
            ],
        );

        let amendment = graph
            .arguments
            .buffer
            .event_for(&EventKey::creation("work_a"))
            .unwrap();
        assert!(!amendment.declared);
        assert!(amendment.has_edge(Property::WasInfluencedBy, "chr_tien"));
        assert!(graph.arguments.turtle.contains("ex:work_a_creation crm:P15_was_influenced_by ex:chr_tien ."));
        assert!(!graph.arguments.turtle.contains("E65_Creation"));
    }
}
