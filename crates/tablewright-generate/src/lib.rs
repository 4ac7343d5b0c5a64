//! Schema-to-table compiler.
//!
//! Each concrete class of a schema becomes a header-only CSV template, a
//! table-schema document and an aggregate metadata document listing every
//! table needed to resolve the class's foreign keys. Relations the table
//! format cannot declare are collected into a manual-check plan.
//!
//! [`GenerationEngine::compile`] is pure; [`GenerationEngine::write`] only
//! runs once everything compiled.

pub mod assembler;
pub mod columns;
pub mod context;
pub mod docs;
pub mod engine;
pub mod errors;
pub mod foreign;
pub mod layout;
pub mod model;
pub mod output;
pub mod triples;
pub mod types;

pub use engine::{CompiledArtifacts, GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use layout::Layout;
pub use model::{
    DEFAULT_IDENTIFIER_NAMESPACE, GenerateOptions, GenerationReport, SyntheticTable, TableReport,
};
pub use types::{ID_TO_NODE_MARKER, IRI_TO_NODE_MARKER};
