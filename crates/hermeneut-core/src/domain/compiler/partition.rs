//! Fact/argument partitioning
//!
//! Both partitions are compiled against one registry so they agree on every
//! identifier. Entities are declared only in the fact output; the argument
//! output references them and amends fact events where it has to.

use std::collections::{BTreeSet, HashSet};

use tracing::info;

use crate::domain::graph::{ClaimType, Diagnostic, GraphInput, Node, Severity};
use crate::domain::ontology::Vocabulary;

use super::buffer::{EntityDeclaration, OutputBuffer};
use super::classifier::EventClassifier;
use super::minters::MinterSet;
use super::polarity::PolarityCorrector;
use super::prepare::{Preparation, prepare};
use super::registry::EntityRegistry;
use super::session::PassSession;
use super::{CompileOptions, CompileStats, CompiledGraph, CompiledLayer};

/// Runs the fact pass, then the argument pass, over one shared registry
pub struct LayerPartitioner<'c> {
    pub options: &'c CompileOptions,
    pub vocabulary: &'c Vocabulary,
    pub classifier: &'c EventClassifier,
    pub corrector: &'c PolarityCorrector,
    pub minters: &'c MinterSet,
}

impl LayerPartitioner<'_> {
    pub fn run(&self, input: &GraphInput, registry: &mut EntityRegistry) -> CompiledGraph {
        let preparation = prepare(input, self.classifier, self.corrector, self.options);

        let mut diagnostics: Vec<Diagnostic> = input.diagnostics().to_vec();
        diagnostics.extend(preparation.diagnostics.iter().cloned());

        let mut facts = OutputBuffer::new();
        self.declare_entities(input, &preparation, registry, &mut facts);
        let prepared_indices: Vec<usize> = preparation.all().map(|r| r.index).collect();

        let Preparation {
            facts: fact_relations,
            arguments: argument_relations,
            ..
        } = preparation;

        PassSession::new(
            ClaimType::Fact,
            input,
            registry,
            &mut facts,
            &mut diagnostics,
            self.options,
            self.minters,
        )
        .run(fact_relations);

        let mut arguments = OutputBuffer::new();
        PassSession::new(
            ClaimType::Argument,
            input,
            registry,
            &mut arguments,
            &mut diagnostics,
            self.options,
            self.minters,
        )
        .run(argument_relations);

        let stats = stats(&facts, &arguments, &diagnostics, &prepared_indices);
        info!(
            entities = stats.entities_declared,
            events = stats.events_minted,
            amended = stats.events_amended,
            dropped = stats.relations_dropped,
            "Compiled document"
        );

        CompiledGraph {
            facts: CompiledLayer::new(ClaimType::Fact, facts),
            arguments: CompiledLayer::new(ClaimType::Argument, arguments),
            diagnostics,
            stats,
        }
    }

    /// Declare entities into the fact buffer, ordered by type then input position
    fn declare_entities(
        &self,
        input: &GraphInput,
        preparation: &Preparation,
        registry: &mut EntityRegistry,
        buffer: &mut OutputBuffer,
    ) {
        let referenced: HashSet<&str> = preparation
            .all()
            .flat_map(|r| [r.source_id(), r.target_id()])
            .collect();

        let mut nodes: Vec<&Node> = input
            .nodes()
            .iter()
            .filter(|n| {
                self.options.declare_unreferenced_entities || referenced.contains(n.id.as_str())
            })
            .collect();
        nodes.sort_by_key(|n| n.entity_type.declaration_rank());

        for node in nodes {
            let iri = registry.register(node);
            if !registry.mark_declared(&iri) {
                continue;
            }
            let appellation = node
                .has_appellation()
                .then(|| registry.reserve(&format!("{iri}_appellation")));
            buffer.declare_entity(EntityDeclaration {
                iri,
                class: self.vocabulary.class_for(node.entity_type).to_string(),
                label: node.name.clone(),
                appellation,
            });
        }
    }
}

fn stats(
    facts: &OutputBuffer,
    arguments: &OutputBuffer,
    diagnostics: &[Diagnostic],
    prepared_indices: &[usize],
) -> CompileStats {
    let dropped: BTreeSet<usize> = diagnostics
        .iter()
        .filter(|d| d.severity() == Severity::Warning)
        .flat_map(Diagnostic::relation_indices)
        .collect();

    CompileStats {
        entities_declared: facts.entity_count(),
        events_minted: facts.minted_count() + arguments.minted_count(),
        events_amended: facts.amended_count() + arguments.amended_count(),
        backpatches: facts.backpatches() + arguments.backpatches(),
        statements: facts.statement_count() + arguments.statement_count(),
        relations_compiled: prepared_indices
            .iter()
            .filter(|i| !dropped.contains(*i))
            .count(),
        relations_dropped: dropped.len(),
    }
}
