use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Declarative foreign key as written into a table-schema document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyConstraint {
    /// Child column name.
    pub column_reference: String,
    pub reference: ForeignKeyReference,
}

/// Parent side of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyReference {
    /// Parent table path, relative to the schema document.
    pub resource: String,
    /// Parent identifier column name.
    pub column_reference: String,
}

/// A relation the table format cannot declare, checked after data is loaded.
///
/// Table paths are relative to the output root; columns are CSV titles.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ManualForeignKeyCheck {
    pub child_table: PathBuf,
    pub child_column: String,
    pub parent_table: PathBuf,
    pub parent_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}
