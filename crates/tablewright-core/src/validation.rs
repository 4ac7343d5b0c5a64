use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::view::{Range, SchemaView};

/// Validate schema-wide invariants before anything is compiled.
///
/// This checks:
/// - every table class has exactly one identifier slot
/// - every slot range resolves to a class, a literal type or a synthetic table
/// - class-valued ranges point at classes that produce a table (or are synthetic)
/// - literal ranges use a supported base kind
/// - implicit prefixes are declared in the prefix table
pub fn validate_schema(view: &SchemaView<'_>, synthetic_tables: &BTreeSet<String>) -> Result<()> {
    let table_classes: BTreeSet<&str> = view.table_classes().map(|c| c.name.as_str()).collect();

    for class in view.table_classes() {
        view.identifier_slot(&class.name)?;

        for slot in view.effective_slots(&class.name)? {
            if let Some(prefix) = slot.implicit_prefix.as_deref() {
                if !view.prefixes().contains_key(prefix) {
                    return Err(Error::integrity(format!(
                        "unable to find prefix definition for implicit_prefix '{prefix}' on slot '{}'",
                        slot.name
                    )));
                }
            }

            if synthetic_tables.contains(&slot.range) {
                continue;
            }

            match view.range_of(slot) {
                Range::Class(target) => {
                    if !table_classes.contains(target.name.as_str()) {
                        return Err(Error::integrity(format!(
                            "slot '{}' of {} references class '{}' which produces no table",
                            slot.name, class.name, target.name
                        )));
                    }
                }
                Range::Literal(literal) => {
                    literal.base_kind()?;
                }
                Range::Unresolved => {
                    return Err(Error::integrity(format!(
                        "slot '{}' of {} has unresolved range '{}'",
                        slot.name, class.name, slot.range
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ClassDef, SchemaModel, SlotDef};
    use crate::types::LiteralTypeDef;

    fn id_slot() -> SlotDef {
        SlotDef {
            identifier: true,
            required: true,
            ..SlotDef::new("id", "string")
        }
    }

    fn schema(classes: Vec<ClassDef>, slots: Vec<SlotDef>) -> SchemaModel {
        SchemaModel {
            name: "test".to_string(),
            types: vec![
                LiteralTypeDef::new("string", "str"),
                LiteralTypeDef::new("ratio", "float"),
            ],
            classes,
            slots,
            ..SchemaModel::default()
        }
    }

    #[test]
    fn accepts_resolvable_schema() {
        let model = schema(
            vec![
                ClassDef::new("Person", &["id"]),
                ClassDef::new("Dataset", &["id", "creator"]),
            ],
            vec![id_slot(), SlotDef::new("creator", "Person")],
        );
        let view = SchemaView::new(&model).unwrap();
        validate_schema(&view, &BTreeSet::new()).expect("schema is valid");
    }

    #[test]
    fn rejects_unresolved_range() {
        let model = schema(
            vec![ClassDef::new("Dataset", &["id", "creator"])],
            vec![id_slot(), SlotDef::new("creator", "Persn")],
        );
        let view = SchemaView::new(&model).unwrap();
        let err = validate_schema(&view, &BTreeSet::new()).unwrap_err();
        assert!(err.to_string().contains("unresolved range 'Persn'"));
    }

    #[test]
    fn synthetic_table_satisfies_range() {
        let model = schema(
            vec![ClassDef::new("Grant", &["id", "funder"])],
            vec![id_slot(), SlotDef::new("funder", "PersonOrOrganization")],
        );
        let view = SchemaView::new(&model).unwrap();
        let synthetic = BTreeSet::from(["PersonOrOrganization".to_string()]);
        validate_schema(&view, &synthetic).expect("synthetic range resolves");
    }

    #[test]
    fn rejects_relation_to_abstract_class() {
        let mut agent = ClassDef::new("Agent", &["id"]);
        agent.is_abstract = true;
        let model = schema(
            vec![agent, ClassDef::new("Dataset", &["id", "creator"])],
            vec![id_slot(), SlotDef::new("creator", "Agent")],
        );
        let view = SchemaView::new(&model).unwrap();
        assert!(validate_schema(&view, &BTreeSet::new()).is_err());
    }

    #[test]
    fn rejects_unsupported_literal_base() {
        let model = schema(
            vec![ClassDef::new("Sample", &["id", "share"])],
            vec![id_slot(), SlotDef::new("share", "ratio")],
        );
        let view = SchemaView::new(&model).unwrap();
        let err = validate_schema(&view, &BTreeSet::new()).unwrap_err();
        assert!(err.to_string().contains("unsupported literal base kind"));
    }

    #[test]
    fn rejects_missing_identifier() {
        let model = schema(
            vec![ClassDef::new("Note", &["text"])],
            vec![SlotDef::new("text", "string")],
        );
        let view = SchemaView::new(&model).unwrap();
        assert!(validate_schema(&view, &BTreeSet::new()).is_err());
    }
}
