//! Domain layer
//!
//! - `graph`: claim graph input model and diagnostics
//! - `ontology`: CIDOC-CRM properties, class vocabulary and namespaces
//! - `compiler`: relation-to-event compilation
//! - `publication`: bibliographic block and TriG container

pub mod compiler;
pub mod graph;
pub mod ontology;
pub mod publication;
