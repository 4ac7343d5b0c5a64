use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{Bound, Extension, LiteralTypeDef};

/// Glyph appended to the column title of a required slot.
pub const REQUIRED_GLYPH: &str = "*";

/// Read-only query interface over a class/slot schema.
///
/// Enumeration order is significant: classes are compiled in the order
/// `classes()` yields them.
pub trait SchemaSource {
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn default_prefix(&self) -> Option<&str>;
    fn prefixes(&self) -> &BTreeMap<String, String>;
    fn literal_types(&self) -> &[LiteralTypeDef];
    fn classes(&self) -> &[ClassDef];
    fn slots(&self) -> &[SlotDef];
}

/// Top-level schema document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Prefix used for classes that carry no explicit `class_uri`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_prefix: Option<String>,
    /// Namespace prefix table (prefix -> base URI).
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub types: Vec<LiteralTypeDef>,
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub slots: Vec<SlotDef>,
}

impl SchemaSource for SchemaModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn default_prefix(&self) -> Option<&str> {
        self.default_prefix.as_deref()
    }

    fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    fn literal_types(&self) -> &[LiteralTypeDef] {
        &self.types
    }

    fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    fn slots(&self) -> &[SlotDef] {
        &self.slots
    }
}

/// A class of the data model; concrete classes become tables.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassDef {
    pub name: String,
    /// Single parent class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_a: Option<String>,
    /// Names of the slots this class declares itself, in column order.
    #[serde(default)]
    pub slots: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, slots: &[&str]) -> Self {
        Self {
            name: name.into(),
            is_a: None,
            slots: slots.iter().map(|slot| slot.to_string()).collect(),
            is_abstract: false,
            class_uri: None,
            description: None,
            extensions: Vec::new(),
        }
    }

    /// Turtle templates declared through a `virtual_triples` extension.
    pub fn virtual_triples(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().filter_map(|ext| match ext {
            Extension::VirtualTriples { turtle } => Some(turtle.as_str()),
            Extension::AboutUrl { .. } => None,
        })
    }
}

/// A named, typed attribute of a class.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SlotDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Literal type name or class name.
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub identifier: bool,
    #[serde(default)]
    pub multivalued: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<Bound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<Bound>,
    /// Prefix prepended to cell values to form node URIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit_prefix: Option<String>,
    #[serde(default)]
    pub designates_type: bool,
    /// Predicate URI or CURIE. Slots without one are not emitted as triples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

fn default_range() -> String {
    "string".to_string()
}

impl SlotDef {
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            range: range.into(),
            required: false,
            identifier: false,
            multivalued: false,
            pattern: None,
            minimum_value: None,
            maximum_value: None,
            implicit_prefix: None,
            designates_type: false,
            slot_uri: None,
            extensions: Vec::new(),
        }
    }

    /// CSV header for this slot: title (or name), plus the required glyph.
    pub fn column_title(&self) -> String {
        let mut title = self.title.clone().unwrap_or_else(|| self.name.clone());
        if self.required {
            title.push_str(REQUIRED_GLYPH);
        }
        title
    }

    /// Value of an `about_url` extension, if declared.
    pub fn about_url_override(&self) -> Option<&str> {
        self.extensions.iter().find_map(|ext| match ext {
            Extension::AboutUrl { value } => Some(value.as_str()),
            Extension::VirtualTriples { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_title_prefers_title_and_marks_required() {
        let mut slot = SlotDef::new("id", "string");
        assert_eq!(slot.column_title(), "id");

        slot.title = Some("Permanent Identifier".to_string());
        slot.required = true;
        assert_eq!(slot.column_title(), "Permanent Identifier*");
    }

    #[test]
    fn slot_range_defaults_to_string() {
        let slot: SlotDef = serde_json::from_str(r#"{"name": "label"}"#).expect("parse slot");
        assert_eq!(slot.range, "string");
        assert!(!slot.multivalued);
    }

    #[test]
    fn abstract_flag_uses_schema_keyword() {
        let class: ClassDef =
            serde_json::from_str(r#"{"name": "Thing", "abstract": true}"#).expect("parse class");
        assert!(class.is_abstract);
        assert!(class.slots.is_empty());
    }
}
