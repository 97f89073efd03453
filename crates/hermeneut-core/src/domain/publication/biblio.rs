//! Bibliographic statements for the document being described
//!
//! Uses fabio, dcterms, foaf, frbr and prism. The output is merged ahead of
//! the fact block in the `facts_<doc>` graph, so author, volume, journal and
//! book names are reserved in the document's [`EntityRegistry`] and never
//! collide with a compiled entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::compiler::{EntityRegistry, slug};
use crate::domain::compiler::turtle::escape_literal;
use crate::error::Result;

/// Publication type of the described document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    JournalArticle,
    BookChapter,
    Book,
}

impl DocumentType {
    pub fn fabio_class(&self) -> &'static str {
        match self {
            Self::JournalArticle => "fabio:JournalArticle",
            Self::BookChapter => "fabio:BookChapter",
            Self::Book => "fabio:Book",
        }
    }

    /// Unknown or missing types read as journal articles
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "book_chapter" => Self::BookChapter,
            "book" => Self::Book,
            _ => Self::JournalArticle,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default, alias = "family")]
    pub family_name: String,
    #[serde(default, alias = "given")]
    pub given_name: String,
}

impl Author {
    /// `<family>_<given>`, either part omitted when empty
    pub fn local_name(&self) -> String {
        let parts: Vec<String> = [&self.family_name, &self.given_name]
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| slug(p))
            .collect();
        if parts.is_empty() {
            "person".to_string()
        } else {
            parts.join("_")
        }
    }
}

/// Enclosing journal volume or book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

/// Document metadata as supplied by the ingestion stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, rename = "type", deserialize_with = "document_type")]
    pub doc_type: DocumentType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "authors_list")]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub container: Option<Container>,
}

fn document_type<'de, D>(deserializer: D) -> std::result::Result<DocumentType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(DocumentType::parse).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MetadataFile {
    Entry { document_metadata: DocumentMetadata },
    Bare(DocumentMetadata),
}

impl DocumentMetadata {
    /// Parse either `{document_metadata: {...}}` or the bare object
    pub fn from_json(text: &str) -> Result<Self> {
        let file: MetadataFile = serde_json::from_str(text)?;
        Ok(match file {
            MetadataFile::Entry { document_metadata } => document_metadata,
            MetadataFile::Bare(metadata) => metadata,
        })
    }

    fn journal_title(&self) -> Option<&str> {
        self.journal
            .as_deref()
            .or_else(|| self.container.as_ref().and_then(|c| c.title.as_deref()))
    }

    fn journal_volume(&self) -> Option<&str> {
        self.volume
            .as_deref()
            .or_else(|| self.container.as_ref().and_then(|c| c.volume.as_deref()))
    }
}

/// Builds the bibliographic Turtle block for one document
#[derive(Debug, Clone)]
pub struct BiblioBuilder {
    doc: String,
}

impl BiblioBuilder {
    /// `doc_id` is slugged into the document's local name
    pub fn new(doc_id: &str) -> Self {
        Self { doc: slug(doc_id) }
    }

    /// Build the block, reserving every minted name in `registry`
    ///
    /// Pass the registry the document was compiled with. The document's own
    /// name is fixed by the container and is not reserved.
    pub fn build(&self, metadata: &DocumentMetadata, registry: &mut EntityRegistry) -> String {
        let mut chunks: Vec<String> = Vec::new();

        let mut reserved: HashMap<String, String> = HashMap::new();
        let author_ids: Vec<String> = metadata
            .authors
            .iter()
            .map(|author| {
                reserved
                    .entry(author.local_name())
                    .or_insert_with_key(|base| registry.reserve(base))
                    .clone()
            })
            .collect();

        let mut doc = vec![format!("a {}", metadata.doc_type.fabio_class())];
        if let Some(title) = &metadata.title {
            doc.push(format!("dcterms:title \"{}\"", escape_literal(title)));
        }
        if let Some(date) = &metadata.date {
            doc.push(format!("dcterms:date \"{}\"", escape_literal(date)));
        }
        for author_id in &author_ids {
            let creator = format!("dcterms:creator ex:{author_id}");
            if !doc.contains(&creator) {
                doc.push(creator);
            }
        }

        let mut extra: Vec<(String, Vec<String>)> = Vec::new();
        match metadata.doc_type {
            DocumentType::JournalArticle => {
                let title = metadata.journal_title();
                let volume = metadata.journal_volume();
                let volume_id = registry.reserve(&match (title, volume) {
                    (Some(t), Some(v)) => slug(&format!("{t}_vol_{v}")),
                    (Some(t), None) => slug(&format!("{t}_vol")),
                    _ => "volume".to_string(),
                });
                let journal_id = registry.reserve(
                    &title
                        .map(|t| slug(&format!("{t}_journal")))
                        .unwrap_or_else(|| "journal".to_string()),
                );
                doc.push(format!("frbr:partOf ex:{volume_id}"));

                let mut vol = vec!["a fabio:JournalVolume".to_string()];
                if let Some(t) = title {
                    vol.push(format!("dcterms:title \"{}\"", escape_literal(t)));
                }
                if let Some(v) = volume {
                    vol.push(format!("prism:volume \"{}\"", escape_literal(v)));
                }
                vol.push(format!("frbr:partOf ex:{journal_id}"));
                extra.push((volume_id, vol));

                let mut journal = vec!["a fabio:Journal".to_string()];
                if let Some(t) = title {
                    journal.push(format!("dcterms:title \"{}\"", escape_literal(t)));
                }
                extra.push((journal_id, journal));
            }
            DocumentType::BookChapter => {
                let title = metadata
                    .container
                    .as_ref()
                    .and_then(|c| c.title.as_deref())
                    .filter(|t| !t.trim().is_empty());
                let book_id =
                    registry.reserve(&title.map(slug).unwrap_or_else(|| "book".to_string()));
                doc.push(format!("frbr:partOf ex:{book_id}"));

                let mut book = vec!["a fabio:Book".to_string()];
                if let Some(t) = title {
                    book.push(format!("dcterms:title \"{}\"", escape_literal(t)));
                }
                extra.push((book_id, book));
            }
            DocumentType::Book => {}
        }

        chunks.push(subject_block(&self.doc, &doc));
        let mut written: Vec<&str> = Vec::new();
        for (author, author_id) in metadata.authors.iter().zip(&author_ids) {
            if written.contains(&author_id.as_str()) {
                continue;
            }
            written.push(author_id.as_str());
            let mut person = vec!["a foaf:Person".to_string()];
            if !author.family_name.is_empty() {
                person.push(format!("foaf:familyName \"{}\"", escape_literal(&author.family_name)));
            }
            if !author.given_name.is_empty() {
                person.push(format!("foaf:givenName \"{}\"", escape_literal(&author.given_name)));
            }
            chunks.push(subject_block(author_id, &person));
        }
        for (subject, predicates) in &extra {
            chunks.push(subject_block(subject, predicates));
        }

        let mut out = chunks.join("\n\n");
        out.push('\n');
        out
    }
}

fn subject_block(subject: &str, predicates: &[String]) -> String {
    format!("ex:{subject} {} .", predicates.join(" ;\n    "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{EntityType, Node};

    fn article() -> DocumentMetadata {
        DocumentMetadata::from_json(
            r#"{"document_metadata": {
                "type": "journal_article",
                "title": "Reading \"Reynaert\"",
                "date": "2019",
                "authors_list": [{"family_name": "Doe", "given_name": "Jane"}],
                "journal": "Queeste",
                "volume": "26"
            }}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_journal_article() {
        let text = BiblioBuilder::new("Doc 01").build(&article(), &mut EntityRegistry::new());

        assert!(text.starts_with("ex:doc_01 a fabio:JournalArticle ;\n"));
        assert!(text.contains("dcterms:title \"Reading \\\"Reynaert\\\"\""));
        assert!(text.contains("dcterms:creator ex:doe_jane"));
        assert!(text.contains("frbr:partOf ex:queeste_vol_26"));
        assert!(text.contains("ex:doe_jane a foaf:Person ;\n    foaf:familyName \"Doe\""));
        assert!(text.contains("ex:queeste_vol_26 a fabio:JournalVolume"));
        assert!(text.contains("prism:volume \"26\""));
        assert!(text.contains("ex:queeste_journal a fabio:Journal ;\n    dcterms:title \"Queeste\" ."));
    }

    #[test]
    fn test_book_chapter() {
        let metadata = DocumentMetadata::from_json(
            r#"{"type": "book_chapter", "title": "Ch. 3", "container": {"title": "Reynaert Studies"}}"#,
        )
        .unwrap();
        let text = BiblioBuilder::new("doc2").build(&metadata, &mut EntityRegistry::new());

        assert!(text.starts_with("ex:doc2 a fabio:BookChapter"));
        assert!(text.contains("frbr:partOf ex:reynaert_studies"));
        assert!(text.contains("ex:reynaert_studies a fabio:Book ;\n    dcterms:title \"Reynaert Studies\" ."));
    }

    #[test]
    fn test_unknown_type_defaults_to_article() {
        let metadata = DocumentMetadata::from_json(r#"{"type": "thesis"}"#).unwrap();

        assert_eq!(metadata.doc_type, DocumentType::JournalArticle);
        let text = BiblioBuilder::new("d").build(&metadata, &mut EntityRegistry::new());
        assert!(text.contains("frbr:partOf ex:volume"));
        assert!(text.contains("ex:journal a fabio:Journal ."));
    }

    #[test]
    fn test_names_avoid_compiled_entities() {
        let mut registry = EntityRegistry::new();
        registry.register(&Node::new("w1", EntityType::Work, "Reynaert Studies"));
        registry.register(&Node::new("p1", EntityType::Person, "Doe Jane"));

        let metadata = DocumentMetadata::from_json(
            r#"{"type": "book_chapter", "container": {"title": "Reynaert Studies"},
                "authors": [{"family": "Doe", "given": "Jane"}, {"family": "Doe", "given": "Jane"}]}"#,
        )
        .unwrap();
        let text = BiblioBuilder::new("doc3").build(&metadata, &mut registry);

        assert!(text.contains("frbr:partOf ex:reynaert_studies_2"));
        assert!(text.contains("ex:reynaert_studies_2 a fabio:Book"));
        assert!(text.contains("dcterms:creator ex:doe_jane_2"));
        assert_eq!(text.matches("a foaf:Person").count(), 1);
        assert_eq!(text.matches("dcterms:creator").count(), 1);
        assert_eq!(registry.iri("w1"), Some("reynaert_studies"));
    }

    #[test]
    fn test_author_local_name() {
        let both = Author {
            family_name: "Van Daele".into(),
            given_name: "Rik".into(),
        };
        let none = Author::default();

        assert_eq!(both.local_name(), "van_daele_rik");
        assert_eq!(none.local_name(), "person");
    }
}
