//! Core contracts for tablewright.
//!
//! This crate defines the class/slot schema model, the indexed view the
//! compiler reads it through, the CSVW document types it produces and the
//! dependency closure shared by the generator and the checkers.

pub mod constraints;
pub mod error;
pub mod graph;
pub mod issues;
pub mod namespaces;
pub mod schema;
pub mod table;
pub mod types;
pub mod validation;
pub mod view;

use schemars::schema::RootSchema;

pub use constraints::{ForeignKeyConstraint, ForeignKeyReference, ManualForeignKeyCheck};
pub use error::{Error, Result};
pub use graph::{ClosureReport, DEFAULT_CLOSURE_ITERATION_LIMIT, DependencyGraph, DependencySet};
pub use issues::{IssueSeverity, ValidationIssue, ValidationReport, normalized_json_pointer};
pub use namespaces::{expand_curie, prefix_uri, resolve_reference};
pub use schema::{ClassDef, REQUIRED_GLYPH, SchemaModel, SchemaSource, SlotDef};
pub use table::{
    CSVW_CONTEXT, ColumnDefinition, Datatype, DatatypeBase, MetadataDocument, TableArtifact,
    TableReference, TableSchemaDocument, Titles,
};
pub use types::{BaseKind, Bound, Extension, LiteralTypeDef};
pub use validation::validate_schema;
pub use view::{Range, SchemaView};

/// Returns the JSON Schema of the schema document format.
pub fn model_json_schema() -> RootSchema {
    schemars::schema_for!(SchemaModel)
}
