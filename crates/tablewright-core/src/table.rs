use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constraints::{ForeignKeyConstraint, ManualForeignKeyCheck};
use crate::types::Bound;

/// JSON-LD context of every emitted table document.
pub const CSVW_CONTEXT: &str = "http://www.w3.org/ns/csvw";

/// Column titles keyed by language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Titles {
    pub en: Vec<String>,
}

impl Titles {
    pub fn single(title: impl Into<String>) -> Self {
        Self {
            en: vec![title.into()],
        }
    }
}

/// Base datatype of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatatypeBase {
    String,
    Date,
    Datetime,
    Int,
    Decimal,
}

/// Datatype descriptor of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datatype {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub base: DatatypeBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Bound>,
}

impl Datatype {
    pub fn base(base: DatatypeBase) -> Self {
        Self {
            id: None,
            base,
            format: None,
            minimum: None,
            maximum: None,
        }
    }

    /// A string datatype tagged with a marker URI.
    pub fn marked_string(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::base(DatatypeBase::String)
        }
    }
}

/// One column of a table schema, authored or virtual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    #[serde(rename = "virtual", default, skip_serializing_if = "is_false")]
    pub is_virtual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titles: Option<Titles>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub suppress_output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Datatype>,
}

impl ColumnDefinition {
    /// A virtual column asserting `property_url value_url` for every row.
    pub fn virtual_triple(
        about_url: Option<String>,
        property_url: impl Into<String>,
        value_url: impl Into<String>,
    ) -> Self {
        Self {
            is_virtual: true,
            about_url,
            property_url: Some(property_url.into()),
            value_url: Some(value_url.into()),
            ..Self::default()
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// `Name.schema.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchemaDocument {
    #[serde(rename = "@context")]
    pub context: String,
    pub columns: Vec<ColumnDefinition>,
    pub about_url: String,
    pub primary_key: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_keys: Option<Vec<ForeignKeyConstraint>>,
}

/// One entry of a metadata document's `tables` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub url: String,
    pub table_schema: String,
    pub suppress_output: bool,
}

/// `Name.csv-metadata.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(rename = "@context")]
    pub context: String,
    pub tables: Vec<TableReference>,
}

/// Everything compiled for one concrete class.
///
/// Paths are relative to the output root.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArtifact {
    pub class_name: String,
    pub csv_path: PathBuf,
    pub schema_path: PathBuf,
    pub metadata_path: PathBuf,
    /// CSV header, one title per authored column.
    pub header: Vec<String>,
    pub schema: TableSchemaDocument,
    pub manual_checks: Vec<ManualForeignKeyCheck>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_omits_unset_fields() {
        let column = ColumnDefinition {
            name: Some("id".to_string()),
            titles: Some(Titles::single("id*")),
            required: true,
            property_url: Some("https://schema.org/identifier".to_string()),
            datatype: Some(Datatype::base(DatatypeBase::String)),
            ..ColumnDefinition::default()
        };

        let value = serde_json::to_value(&column).expect("serialize column");
        assert_eq!(
            value,
            serde_json::json!({
                "name": "id",
                "titles": {"en": ["id*"]},
                "required": true,
                "propertyUrl": "https://schema.org/identifier",
                "datatype": {"base": "string"}
            })
        );
    }

    #[test]
    fn virtual_column_serializes_flag() {
        let column = ColumnDefinition::virtual_triple(None, "rdf:type", "https://schema.org/Thing");
        let value = serde_json::to_value(&column).expect("serialize column");
        assert_eq!(value["virtual"], serde_json::json!(true));
        assert!(value.get("name").is_none());
    }
}
