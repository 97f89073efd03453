//! Relation-to-event graph compiler
//!
//! Turns a flat claim graph into CIDOC-CRM statement blocks, one for
//! established facts and one for the author's arguments.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Preparation                            │
//! │  GraphInput → references → confidence → EventClassifier →        │
//! │               PolarityCorrector → facts / arguments              │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 ↓
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         LayerPartitioner                         │
//! │  declare entities → fact pass → argument pass (shared registry)  │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 ↓
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           PassSession                            │
//! │  EventGrouper → phase 1 minters → phase 2 (influence) minters    │
//! │              → OutputBuffer (appendable EventRecords)            │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 ↓
//!                        turtle::render (once)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hermeneut_core::domain::compiler::Compiler;
//! use hermeneut_core::domain::graph::GraphInput;
//!
//! let input = GraphInput::from_json(&text)?;
//! let graph = Compiler::default().compile(&input);
//! println!("{}", graph.facts.turtle);
//! ```

pub mod buffer;
pub mod classifier;
pub mod grouper;
pub mod minters;
pub mod partition;
pub mod polarity;
pub mod prepare;
pub mod record;
pub mod registry;
pub mod session;
pub mod turtle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::domain::graph::{ClaimType, Diagnostic, GraphInput, Severity};
use crate::domain::ontology::Vocabulary;

pub use buffer::OutputBuffer;
pub use classifier::{EventCategory, EventClassifier, GroupKey};
pub use grouper::{EventGroup, EventGrouper, PreparedRelation};
pub use minters::{EventMinter, MintContext, MinterSet};
pub use partition::LayerPartitioner;
pub use polarity::{Polarity, PolarityCorrector};
pub use record::{EventKey, EventKind, EventRecord};
pub use registry::{EntityRegistry, slug};

/// What to do with an influence on a work that has no Creation event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedInfluence {
    /// Mint a minimal Creation event and attach the influence to it
    #[default]
    Stub,
    /// Drop the relation with `incomplete_event_data`
    Drop,
}

impl UnresolvedInfluence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::Drop => "drop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stub" => Some(Self::Stub),
            "drop" => Some(Self::Drop),
            _ => None,
        }
    }
}

/// Compiler settings (the `[compiler]` config section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Relations below this confidence are dropped
    pub min_confidence: f32,
    pub unresolved_influence: UnresolvedInfluence,
    /// Declare every valid node, not only those a relation references
    pub declare_unreferenced_entities: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            unresolved_influence: UnresolvedInfluence::Stub,
            declare_unreferenced_entities: false,
        }
    }
}

/// Counters for one compiled document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileStats {
    pub entities_declared: usize,
    pub events_minted: usize,
    pub events_amended: usize,
    pub backpatches: usize,
    pub statements: usize,
    pub relations_compiled: usize,
    pub relations_dropped: usize,
}

/// One partition's buffer and its rendering
#[derive(Debug, Clone)]
pub struct CompiledLayer {
    pub claim: ClaimType,
    pub buffer: OutputBuffer,
    /// Turtle statements without prefix declarations
    pub turtle: String,
}

impl CompiledLayer {
    pub fn new(claim: ClaimType, buffer: OutputBuffer) -> Self {
        let turtle = turtle::render(&buffer);
        Self {
            claim,
            buffer,
            turtle,
        }
    }
}

/// Result of compiling one document
#[derive(Debug, Clone)]
pub struct CompiledGraph {
    pub facts: CompiledLayer,
    pub arguments: CompiledLayer,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: CompileStats,
}

impl CompiledGraph {
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Warning)
    }

    /// Serializable summary for tooling
    pub fn report(&self, doc_id: Option<&str>) -> CompileReport {
        CompileReport {
            doc_id: doc_id.map(str::to_string),
            generated_at: Utc::now(),
            stats: self.stats.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompileReport {
    pub doc_id: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub stats: CompileStats,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles claim graphs; holds no per-document state
#[derive(Debug, Default)]
pub struct Compiler {
    options: CompileOptions,
    vocabulary: Vocabulary,
    classifier: EventClassifier,
    corrector: PolarityCorrector,
    minters: MinterSet,
}

impl Compiler {
    pub fn new(options: CompileOptions, vocabulary: Vocabulary) -> Self {
        Self {
            options,
            vocabulary,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.compiler.clone(), config.vocabulary.clone())
    }

    /// Replace the minter for one category
    pub fn with_minter(mut self, minter: Box<dyn EventMinter>) -> Self {
        self.minters.register(minter);
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile one document with a fresh registry
    pub fn compile(&self, input: &GraphInput) -> CompiledGraph {
        let mut registry = EntityRegistry::new();
        self.compile_with(input, &mut registry)
    }

    /// Compile one document against a caller-owned registry
    ///
    /// The registry must be new or [`reset`](EntityRegistry::reset): state
    /// left from another document suppresses declarations and events.
    pub fn compile_with(&self, input: &GraphInput, registry: &mut EntityRegistry) -> CompiledGraph {
        if !registry.is_empty() {
            warn!("Registry carries state from an earlier document; reset it between documents");
        }
        LayerPartitioner {
            options: &self.options,
            vocabulary: &self.vocabulary,
            classifier: &self.classifier,
            corrector: &self.corrector,
            minters: &self.minters,
        }
        .run(input, registry)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{compile, fact};
    use super::*;
    use crate::domain::graph::{EntityType, Node};

    #[test]
    fn test_unresolved_influence_parsing() {
        assert_eq!(UnresolvedInfluence::parse("Drop"), Some(UnresolvedInfluence::Drop));
        assert_eq!(UnresolvedInfluence::parse("defer"), None);
        assert_eq!(UnresolvedInfluence::default().as_str(), "stub");
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut vocabulary = Vocabulary::default();
        vocabulary
            .classes
            .insert("genre".to_string(), "E55_Type".to_string());
        let compiler = Compiler::new(CompileOptions::default(), vocabulary);

        let graph = compiler.compile(&GraphInput::new(
            vec![
                Node::new("w1", EntityType::Work, "Work A"),
                Node::new("g1", EntityType::Genre, "Beast epic"),
            ],
            vec![fact("w1", "g1", "has_genre")],
        ));

        assert!(graph.facts.turtle.contains("ex:beast_epic a crm:E55_Type ;"));
    }

    #[test]
    fn test_report() {
        let graph = compile(
            vec![Node::new("p1", EntityType::Person, "Jane Doe")],
            vec![fact("p1", "ghost", "lived_in")],
        );
        let report = graph.report(Some("doc1"));

        assert!(graph.has_warnings());
        assert_eq!(report.doc_id.as_deref(), Some("doc1"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["diagnostics"][0]["kind"], "missing_reference");
        assert_eq!(json["stats"]["relations_dropped"], 1);
    }
}
