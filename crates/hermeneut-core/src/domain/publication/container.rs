//! TriG container for one compiled document
//!
//! Graph order is fixed: facts (bibliographic block first), assertion, any
//! supplied graphs verbatim, then the nanopublication head.

use tracing::debug;

use crate::domain::compiler::{CompiledGraph, slug};
use crate::domain::ontology::Namespaces;

/// Prefixes for the bibliographic vocabularies, after the configured ones
const FIXED_PREFIXES: [(&str, &str); 6] = [
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("fabio", "http://purl.org/spar/fabio/"),
    ("frbr", "http://purl.org/vocab/frbr/core#"),
    ("prism", "http://prismstandard.org/namespaces/basic/2.0/"),
];

/// Assembles the named graphs of one nanopublication
#[derive(Debug, Clone)]
pub struct TrigContainer<'a> {
    namespaces: &'a Namespaces,
    doc: String,
    biblio: Option<String>,
    graphs: Vec<String>,
}

impl<'a> TrigContainer<'a> {
    pub fn new(namespaces: &'a Namespaces, doc_id: &str) -> Self {
        Self {
            namespaces,
            doc: slug(doc_id),
            biblio: None,
            graphs: Vec::new(),
        }
    }

    /// Bibliographic statements placed ahead of the facts
    pub fn with_biblio(mut self, biblio: impl Into<String>) -> Self {
        self.biblio = Some(biblio.into());
        self
    }

    /// A complete graph block (`name { ... }`) copied as-is
    pub fn with_graph(mut self, graph: impl Into<String>) -> Self {
        self.graphs.push(graph.into());
        self
    }

    /// Local name of the document, as used in graph names
    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn render(&self, graph: &CompiledGraph) -> String {
        let mut sections = vec![self.prefixes()];

        let mut facts = String::new();
        if let Some(biblio) = self.biblio.as_deref().filter(|b| !b.trim().is_empty()) {
            facts.push_str(biblio.trim_end());
            facts.push_str("\n\n");
        }
        facts.push_str(&graph.facts.turtle);
        sections.push(named_graph(&format!("facts_{}", self.doc), &facts));
        sections.push(named_graph(
            &format!("assertion_{}", self.doc),
            &graph.arguments.turtle,
        ));

        for extra in &self.graphs {
            sections.push(extra.trim().to_string());
        }
        sections.push(named_graph(&format!("head_{}", self.doc), &self.head()));

        debug!(doc = %self.doc, graphs = sections.len() - 1, "Rendered container");
        let mut out = sections.join("\n\n");
        out.push('\n');
        out
    }

    fn prefixes(&self) -> String {
        self.namespaces
            .bindings()
            .into_iter()
            .chain(FIXED_PREFIXES)
            .map(|(prefix, iri)| format!("@prefix {prefix}: <{iri}> ."))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn head(&self) -> String {
        let doc = &self.doc;
        format!(
            "ex:pub_{doc} a np:Nanopublication ;\n    \
             np:hasAssertion ex:assertion_{doc} ;\n    \
             np:hasProvenance ex:provenance_{doc} ;\n    \
             np:hasPublicationInfo ex:pubInfo_{doc} ."
        )
    }
}

fn named_graph(name: &str, body: &str) -> String {
    let mut out = format!("ex:{name} {{\n");
    for line in body.trim_end().lines() {
        if !line.is_empty() {
            out.push_str("    ");
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push('}');
    out
}
