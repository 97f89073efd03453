//! Hermeneut Core Library
//!
//! This crate provides the core functionality for Hermeneut, including:
//! - Claim graph input (nodes, relations, fact/argument claim types)
//! - Relation-to-event compilation into CIDOC-CRM statements
//! - Fact/argument partitioning over one identifier registry
//! - Bibliographic description and TriG nanopublication containers
//! - File-backed configuration

pub mod config;
pub mod domain;
pub mod error;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::compiler::{CompileOptions, CompiledGraph, Compiler, EntityRegistry};
    pub use crate::domain::graph::{ClaimType, Diagnostic, EntityType, GraphInput, Node, Relation};
    pub use crate::domain::publication::{BiblioBuilder, DocumentMetadata, TrigContainer};
    pub use crate::error::{Error, Result};
}
