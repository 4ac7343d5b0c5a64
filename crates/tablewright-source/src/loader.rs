use std::fs;
use std::path::Path;

use jsonschema::JSONSchema;
use serde_json::Value;
use tablewright_core::{
    SchemaModel, ValidationIssue, ValidationReport, model_json_schema, normalized_json_pointer,
};

use crate::errors::{Result, SourceError};
use crate::options::SourceFormat;

/// Load and validate a schema document from disk.
pub fn load_schema(path: &Path) -> Result<SchemaModel> {
    let format = SourceFormat::from_path(path).ok_or_else(|| SourceError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path)?;
    parse_schema(&text, format)
}

/// Parse and validate a schema document held in memory.
pub fn parse_schema(text: &str, format: SourceFormat) -> Result<SchemaModel> {
    let value: Value = match format {
        SourceFormat::Yaml => serde_yaml::from_str(text)?,
        SourceFormat::Json => serde_json::from_str(text)?,
    };

    let report = validate_model_json(&value)?;
    if !report.is_ok() {
        return Err(SourceError::Invalid(report));
    }

    Ok(serde_json::from_value(value)?)
}

/// Validate a schema document against the JSON Schema of [`SchemaModel`].
pub fn validate_model_json(document: &Value) -> Result<ValidationReport> {
    let schema = serde_json::to_value(model_json_schema())?;
    let compiled = JSONSchema::compile(&schema).map_err(|err| {
        SourceError::Invalid(ValidationReport::single(ValidationIssue::error(
            "model_schema_error",
            "/",
            err.to_string(),
        )))
    })?;

    let mut report = ValidationReport::default();
    if let Err(errors) = compiled.validate(document) {
        for error in errors {
            report.push_error(ValidationIssue::error(
                "schema_violation",
                normalized_json_pointer(&error.instance_path.to_string()),
                error.to_string(),
            ));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODEL_YAML: &str = r#"
name: people
description: People and the datasets they create.
default_prefix: ex
prefixes:
  ex: https://example.org/
  schema: https://schema.org/
types:
  - name: string
    base: str
  - name: date
    base: XSDDate
    uri: xsd:date
classes:
  - name: Person
    slots: [id, name]
  - name: Dataset
    slots: [id, creator, published]
    extensions:
      - kind: virtual_triples
        turtle: "<> a schema:Dataset ."
slots:
  - name: id
    identifier: true
    required: true
    slot_uri: schema:identifier
  - name: name
    slot_uri: schema:name
  - name: creator
    range: Person
    required: true
  - name: published
    range: date
    minimum_value: 1990
"#;

    #[test]
    fn parses_yaml_document() {
        let model = parse_schema(MODEL_YAML, SourceFormat::Yaml).expect("load model");
        assert_eq!(model.name, "people");
        assert_eq!(model.classes.len(), 2);
        assert_eq!(model.classes[1].virtual_triples().count(), 1);
        assert_eq!(model.slots[2].range, "Person");
        assert_eq!(model.prefixes["schema"], "https://schema.org/");
    }

    #[test]
    fn reports_structural_issues_with_pointers() {
        let text = r#"{"name": "broken", "classes": [{"name": "A", "slots": "id"}]}"#;
        let err = parse_schema(text, SourceFormat::Json).unwrap_err();
        let SourceError::Invalid(report) = err else {
            panic!("expected structural report, got {err}");
        };
        assert!(report.errors.iter().any(|issue| issue.path == "/classes/0/slots"));
    }

    #[test]
    fn missing_name_is_reported_at_root() {
        let report = validate_model_json(&serde_json::json!({"classes": []})).expect("validate");
        assert!(!report.is_ok());
        assert_eq!(report.errors[0].path, "/");
    }

    #[test]
    fn rejects_unknown_extension_kind() {
        let text = r#"{"name": "x", "slots": [{"name": "s", "extensions": [{"kind": "sparql"}]}]}"#;
        assert!(matches!(
            parse_schema(text, SourceFormat::Json),
            Err(SourceError::Invalid(_))
        ));
    }
}
