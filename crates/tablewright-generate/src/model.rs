use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tablewright_core::DEFAULT_CLOSURE_ITERATION_LIMIT;

/// Default namespace for row identifiers and marker datatypes.
pub const DEFAULT_IDENTIFIER_NAMESPACE: &str = "https://w3id.org/example/";

/// Options for a compile run. Every field has a default so partial
/// configuration files deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Directory where artifacts are written.
    pub out_dir: PathBuf,
    /// Base URI of row identifiers (`<ns>{+id}`) and node-reference markers.
    pub identifier_namespace: String,
    /// Separator of multivalued cells.
    pub separator: String,
    /// Schema and metadata documents land here, relative to `out_dir`.
    pub remote_dir: PathBuf,
    /// Check logs land here, relative to `out_dir`.
    pub validation_dir: PathBuf,
    /// Ceiling on dependency-closure passes.
    pub closure_iteration_limit: usize,
    /// Slots whose columns describe the row's input-metadata subject.
    pub input_metadata_slots: BTreeSet<String>,
    /// Persistent content URL per class name.
    pub content_urls: BTreeMap<String, String>,
    /// Fail when a concrete class has no content URL.
    pub require_content_urls: bool,
    /// Tables assembled outside the compiler that relations may target.
    pub synthetic_tables: Vec<SyntheticTable>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            identifier_namespace: DEFAULT_IDENTIFIER_NAMESPACE.to_string(),
            separator: "|".to_string(),
            remote_dir: PathBuf::from("remote"),
            validation_dir: PathBuf::from("out/validation"),
            closure_iteration_limit: DEFAULT_CLOSURE_ITERATION_LIMIT,
            input_metadata_slots: BTreeSet::new(),
            content_urls: BTreeMap::new(),
            require_content_urls: false,
            synthetic_tables: Vec::new(),
        }
    }
}

impl GenerateOptions {
    pub fn synthetic_names(&self) -> BTreeSet<String> {
        self.synthetic_tables
            .iter()
            .map(|table| table.name.clone())
            .collect()
    }
}

/// A relation target that is not authored from a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticTable {
    /// Range name relations use to target this table.
    pub name: String,
    /// CSV path relative to the output root.
    pub path: PathBuf,
    /// Schema document file name inside the remote directory.
    #[serde(default = "default_synthetic_schema")]
    pub schema: String,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    /// CSV header of the identifier column.
    #[serde(default = "default_id_title")]
    pub id_title: String,
}

fn default_synthetic_schema() -> String {
    "unioned-identifiers.schema.json".to_string()
}

fn default_id_column() -> String {
    "id".to_string()
}

fn default_id_title() -> String {
    "Permanent Identifier*".to_string()
}

impl SyntheticTable {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            schema: default_synthetic_schema(),
            id_column: default_id_column(),
            id_title: default_id_title(),
        }
    }
}

/// Summary of a compiled table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub class_name: String,
    pub columns: usize,
    pub virtual_columns: usize,
    pub foreign_keys: usize,
    pub manual_checks: usize,
    /// Size of the closed dependency set.
    pub dependencies: usize,
}

/// Summary of a compile run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub schema_name: String,
    pub tables: Vec<TableReport>,
    pub closure_passes: usize,
    pub check_tasks: usize,
    /// Written files, relative to the output root.
    pub files: Vec<PathBuf>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let options: GenerateOptions = serde_json::from_str(
            r#"{"separator": ";", "synthetic_tables": [{"name": "Agent", "path": "out/validation/agents.csv"}]}"#,
        )
        .expect("parse options");

        assert_eq!(options.separator, ";");
        assert_eq!(options.identifier_namespace, DEFAULT_IDENTIFIER_NAMESPACE);
        assert_eq!(options.closure_iteration_limit, DEFAULT_CLOSURE_ITERATION_LIMIT);
        assert_eq!(options.synthetic_tables.len(), 1);
        let agent = &options.synthetic_tables[0];
        assert_eq!(agent.name, "Agent");
        assert_eq!(agent.id_column, "id");
        assert_eq!(agent.schema, "unioned-identifiers.schema.json");
    }
}
