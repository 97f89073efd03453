//! Claim graph: the compiler's input
//!
//! An extractor reads a scholarly document and hands over a flat set of typed
//! nodes and directed relations. Each relation is tagged as an established
//! fact or as the author's argument.
//!
//! ## Data Model
//!
//! - **Node**: a typed entity (work, person, place, date, ...)
//! - **Relation**: a typed edge between two nodes, with a claim type
//! - **GraphInput**: the validated batch, with an id index
//! - **Diagnostic**: a non-fatal problem found while reading or compiling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hermeneut_core::domain::graph::GraphInput;
//!
//! let input = GraphInput::from_json(&text)?;
//! for diag in input.diagnostics() {
//!     tracing::warn!(code = diag.code(), "{diag}");
//! }
//! ```

mod diagnostic;
mod entity;
mod payload;
mod relationship;

pub use diagnostic::{Diagnostic, Severity};
pub use entity::{EntityType, Node};
pub use payload::{
    GraphInput, GraphPayload, InputRelation, RawGraph, RawNode, RawRelation, WorkSchemaMetadata,
};
pub use relationship::{ClaimType, Relation, normalize_relation_type};
