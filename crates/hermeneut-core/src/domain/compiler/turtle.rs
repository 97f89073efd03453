//! Turtle rendering of an output buffer
//!
//! Resources are written as `ex:` prefixed names, vocabulary as `crm:`.
//! Prefix declarations belong to the container document.

use crate::domain::ontology::{APPELLATION_CLASS, Property, TYPE_CLASS};

use super::buffer::{Block, OutputBuffer};
use super::record::EventRecord;

const INDENT: &str = "    ";

/// Escape a string for a double-quoted Turtle literal
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Render a buffer; blocks are separated by one blank line
pub fn render(buffer: &OutputBuffer) -> String {
    let mut chunks: Vec<String> = Vec::with_capacity(buffer.blocks().len());
    for block in buffer.blocks() {
        let chunk = match block {
            Block::Entity(decl) => match &decl.appellation {
                Some(app) => format!(
                    "ex:{} a crm:{} ;\n{INDENT}{} ex:{} .\n\n{}",
                    decl.iri,
                    decl.class,
                    Property::IsIdentifiedBy.curie(),
                    app,
                    appellation(app, &decl.label)
                ),
                None => format!(
                    "ex:{} a crm:{} ;\n{INDENT}rdfs:label \"{}\" .",
                    decl.iri,
                    decl.class,
                    escape_literal(&decl.label)
                ),
            },
            Block::Classification(c) => format!(
                "ex:{} a crm:{TYPE_CLASS} ;\n{INDENT}{} ex:{} .\n\n{}",
                c.iri,
                Property::IsIdentifiedBy.curie(),
                c.appellation,
                appellation(&c.appellation, &c.label)
            ),
            Block::Event { position } => match buffer.event(*position) {
                Some(record) if !record.is_empty_amendment() => event(record),
                _ => continue,
            },
            Block::Statement(s) => {
                format!("ex:{} {} ex:{} .", s.subject, s.predicate.curie(), s.object)
            }
        };
        chunks.push(chunk);
    }

    if chunks.is_empty() {
        return String::new();
    }
    let mut out = chunks.join("\n\n");
    out.push('\n');
    out
}

fn appellation(iri: &str, label: &str) -> String {
    format!(
        "ex:{iri} a crm:{APPELLATION_CLASS} ;\n{INDENT}rdfs:label \"{}\" .",
        escape_literal(label)
    )
}

fn event(record: &EventRecord) -> String {
    let mut predicates: Vec<String> = Vec::new();
    if record.declared {
        predicates.push(format!("a crm:{}", record.key.kind.class_name()));
    }
    for edge in record.edges() {
        predicates.push(format!("{} ex:{}", edge.predicate.curie(), edge.object));
    }
    if let Some(app) = &record.appellation {
        predicates.push(format!("{} ex:{}", Property::IsIdentifiedBy.curie(), app.iri));
    }

    let mut out = format!("ex:{} ", record.iri);
    let last = predicates.len().saturating_sub(1);
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            out.push_str(INDENT);
        }
        out.push_str(predicate);
        out.push_str(if i == last { " ." } else { " ;\n" });
    }

    if let Some(app) = &record.appellation {
        out.push_str("\n\n");
        out.push_str(&appellation(&app.iri, &app.label));
    }
    out
}
