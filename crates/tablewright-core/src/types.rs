use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named literal type a slot range may refer to.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LiteralTypeDef {
    pub name: String,
    /// Base kind as written in the schema (`str`, `uri`, `XSDDate`, ...).
    /// Absent means `str`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Canonical URI or CURIE of the type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LiteralTypeDef {
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: Some(base.into()),
            uri: None,
            title: None,
            description: None,
        }
    }

    /// Resolve the declared base into a supported kind.
    ///
    /// Unknown bases are rejected rather than defaulted so that typos in the
    /// schema surface immediately.
    pub fn base_kind(&self) -> Result<BaseKind> {
        let raw = self.base.as_deref().unwrap_or("str");
        BaseKind::parse(raw).ok_or_else(|| {
            Error::integrity(format!(
                "unsupported literal base kind '{raw}' for type '{}'",
                self.name
            ))
        })
    }
}

/// Supported literal base kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BaseKind {
    String,
    Uri,
    Date,
    DateTime,
    Int,
    Decimal,
}

impl BaseKind {
    /// Accepts both the plain names and the LinkML runtime spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "str" | "string" => Some(BaseKind::String),
            "uri" => Some(BaseKind::Uri),
            "xsddate" | "date" => Some(BaseKind::Date),
            "xsddatetime" | "datetime" => Some(BaseKind::DateTime),
            "int" => Some(BaseKind::Int),
            "decimal" => Some(BaseKind::Decimal),
            _ => None,
        }
    }
}

/// Numeric bound attached to a literal slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Bound {
    Int(i64),
    Decimal(f64),
}

/// Escape-hatch metadata attached to a class or slot.
///
/// Each variant is only meaningful in one place: `about_url` on slots,
/// `virtual_triples` on classes. Misplaced entries are rejected where they
/// are consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extension {
    /// Overrides the subject of a slot's column. Resolved as a URI reference
    /// against the row identifier template.
    AboutUrl { value: String },
    /// Turtle statements asserted for every row of a class.
    VirtualTriples { turtle: String },
}
