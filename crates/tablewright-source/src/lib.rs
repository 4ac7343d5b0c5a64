//! Schema document loading.
//!
//! A schema document (YAML or JSON) is structurally validated against the
//! JSON Schema of [`SchemaModel`] before it is deserialized, so malformed
//! input is reported as a list of pointer-addressed issues instead of a
//! single serde error.

pub mod errors;
pub mod loader;
pub mod options;

pub use errors::{Result, SourceError};
pub use loader::{load_schema, parse_schema, validate_model_json};
pub use options::SourceFormat;

pub use tablewright_core::SchemaModel;
