//! One compilation pass over one partition
//!
//! A pass groups its relations and hands every group to the minter of its
//! category, in two phases: all non-deferred groups first, then the deferred
//! (influence) groups, each phase in first-seen key order.

use tracing::{info, warn};

use crate::domain::graph::{ClaimType, Diagnostic, GraphInput};

use super::CompileOptions;
use super::buffer::OutputBuffer;
use super::grouper::{EventGroup, EventGrouper, PreparedRelation};
use super::minters::{MintContext, MinterSet};
use super::registry::EntityRegistry;

/// A single pass: one partition, one buffer, the shared registry
pub struct PassSession<'a> {
    cx: MintContext<'a>,
    minters: &'a MinterSet,
}

impl<'a> PassSession<'a> {
    pub fn new(
        claim: ClaimType,
        input: &'a GraphInput,
        registry: &'a mut EntityRegistry,
        buffer: &'a mut OutputBuffer,
        diagnostics: &'a mut Vec<Diagnostic>,
        options: &'a CompileOptions,
        minters: &'a MinterSet,
    ) -> Self {
        Self {
            cx: MintContext {
                input,
                registry,
                buffer,
                diagnostics,
                options,
                claim,
            },
            minters,
        }
    }

    /// Group and mint; returns the number of groups processed
    pub fn run(mut self, relations: Vec<PreparedRelation>) -> usize {
        let groups = EventGrouper::group(relations);
        let (deferred, immediate): (Vec<EventGroup>, Vec<EventGroup>) = groups
            .into_iter()
            .partition(|g| g.category().is_deferred());
        let total = immediate.len() + deferred.len();

        for group in immediate.iter().chain(deferred.iter()) {
            self.mint(group);
        }

        info!(
            layer = self.cx.claim.layer(),
            groups = total,
            events = self.cx.buffer.events().len(),
            statements = self.cx.buffer.statement_count(),
            backpatches = self.cx.buffer.backpatches(),
            "Pass complete"
        );
        total
    }

    fn mint(&mut self, group: &EventGroup) {
        match self.minters.get(group.category()) {
            Some(minter) => minter.mint(group, &mut self.cx),
            None => {
                warn!(group_key = %group.key, "No minter registered for category");
                for relation in &group.relations {
                    self.cx.report(Diagnostic::UnclassifiedRelationType {
                        relation_index: relation.index,
                        relation_type: relation.relation_type().to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::compiler::classifier::EventCategory;
    use crate::domain::compiler::minters::CreationMinter;
    use crate::domain::graph::{EntityType, Node, Relation};
    use crate::domain::ontology::Property;

    fn prepared(index: usize, src: &str, tgt: &str, rel: &str, category: EventCategory, types: (EntityType, EntityType)) -> PreparedRelation {
        PreparedRelation {
            index,
            relation: Relation::new(src, tgt, rel, ClaimType::Fact),
            category,
            source_type: types.0,
            target_type: types.1,
        }
    }

    fn registered(input: &GraphInput) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        for node in input.nodes() {
            registry.register(node);
        }
        registry
    }

    #[test]
    fn test_influence_runs_after_creation() {
        let input = GraphInput::new(
            vec![
                Node::new("w1", EntityType::Work, "Work A"),
                Node::new("p1", EntityType::Person, "Jane Doe"),
                Node::new("c1", EntityType::Concept, "Allegory"),
            ],
            vec![],
        );
        let mut registry = registered(&input);
        let mut buffer = OutputBuffer::new();
        let mut diagnostics = Vec::new();
        let options = CompileOptions::default();
        let minters = MinterSet::with_defaults();

        let groups = PassSession::new(
            ClaimType::Fact,
            &input,
            &mut registry,
            &mut buffer,
            &mut diagnostics,
            &options,
            &minters,
        )
        .run(vec![
            prepared(0, "p1", "c1", "influenced_by", EventCategory::Influence, (EntityType::Person, EntityType::Concept)),
            prepared(1, "w1", "p1", "created_by", EventCategory::Creation, (EntityType::Work, EntityType::Person)),
        ]);

        assert_eq!(groups, 2);
        assert!(buffer.has_triple("work_a_creation", Property::WasInfluencedBy, "allegory"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_minter_is_reported() {
        let input = GraphInput::new(
            vec![
                Node::new("p1", EntityType::Person, "Jane Doe"),
                Node::new("pl1", EntityType::Place, "Ghent"),
            ],
            vec![],
        );
        let mut registry = registered(&input);
        let mut buffer = OutputBuffer::new();
        let mut diagnostics = Vec::new();
        let options = CompileOptions::default();
        let mut minters = MinterSet::empty();
        minters.register(Box::new(CreationMinter));

        PassSession::new(
            ClaimType::Fact,
            &input,
            &mut registry,
            &mut buffer,
            &mut diagnostics,
            &options,
            &minters,
        )
        .run(vec![prepared(
            4,
            "p1",
            "pl1",
            "lived_in",
            EventCategory::PersonResidence,
            (EntityType::Person, EntityType::Place),
        )]);

        assert_eq!(buffer.statement_count(), 0);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].relation_index(), Some(4));
    }
}
