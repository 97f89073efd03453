//! Publication packaging
//!
//! Wraps the compiled fact and argument blocks into a nanopublication: a
//! bibliographic description of the source document plus the TriG container.

pub mod biblio;
pub mod container;

pub use biblio::{Author, BiblioBuilder, Container, DocumentMetadata, DocumentType};
pub use container::TrigContainer;
