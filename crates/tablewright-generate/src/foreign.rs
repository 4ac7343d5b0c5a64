use std::path::{Path, PathBuf};

use tablewright_core::{
    Datatype, ForeignKeyConstraint, ForeignKeyReference, ManualForeignKeyCheck, SlotDef,
};

use crate::types::ID_TO_NODE_MARKER;

/// Parent side of a relation: a class table or a synthetic table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationTarget {
    /// Parent CSV, relative to the output root.
    pub table: PathBuf,
    /// Parent identifier column name, used by declarative keys.
    pub id_column: String,
    /// Parent identifier column title, used by manual checks.
    pub id_title: String,
}

/// Naming inputs shared by every relation of a run.
#[derive(Debug, Clone, Copy)]
pub struct RelationNaming<'a> {
    pub identifier_namespace: &'a str,
    pub separator: &'a str,
    /// URL of the parent table as seen from the remote directory.
    pub parent_url: &'a str,
}

/// How a relation is enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enforcement {
    Declarative(ForeignKeyConstraint),
    Manual(ManualForeignKeyCheck),
}

/// Column settings and enforcement for a relational slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationPlan {
    pub value_url: Option<String>,
    pub separator: Option<String>,
    pub datatype: Option<Datatype>,
    pub enforcement: Enforcement,
}

/// Classify a relational slot.
///
/// | multivalued | required | outcome |
/// |---|---|---|
/// | yes | any | manual check with separator, node-reference marker datatype |
/// | no | yes | declarative foreign key |
/// | no | no | manual check without separator |
pub fn plan_relation(
    slot: &SlotDef,
    child_table: &Path,
    child_title: &str,
    target: &RelationTarget,
    naming: RelationNaming<'_>,
) -> RelationPlan {
    let manual = |separator: Option<&str>| {
        Enforcement::Manual(ManualForeignKeyCheck {
            child_table: child_table.to_path_buf(),
            child_column: child_title.to_string(),
            parent_table: target.table.clone(),
            parent_column: target.id_title.clone(),
            separator: separator.map(str::to_string),
        })
    };

    if slot.multivalued {
        return RelationPlan {
            value_url: None,
            separator: Some(naming.separator.to_string()),
            datatype: Some(Datatype::marked_string(format!(
                "{}{ID_TO_NODE_MARKER}",
                naming.identifier_namespace
            ))),
            enforcement: manual(Some(naming.separator)),
        };
    }

    let enforcement = if slot.required {
        Enforcement::Declarative(ForeignKeyConstraint {
            column_reference: slot.name.clone(),
            reference: ForeignKeyReference {
                resource: naming.parent_url.to_string(),
                column_reference: target.id_column.clone(),
            },
        })
    } else {
        manual(None)
    };

    RelationPlan {
        value_url: Some(format!("{}{{+{}}}", naming.identifier_namespace, slot.name)),
        separator: None,
        datatype: None,
        enforcement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> RelationTarget {
        RelationTarget {
            table: PathBuf::from("Person.csv"),
            id_column: "id".to_string(),
            id_title: "id*".to_string(),
        }
    }

    fn naming() -> RelationNaming<'static> {
        RelationNaming {
            identifier_namespace: "https://w3id.org/example/",
            separator: "|",
            parent_url: "../Person.csv",
        }
    }

    fn slot(required: bool, multivalued: bool) -> SlotDef {
        SlotDef {
            required,
            multivalued,
            ..SlotDef::new("creator", "Person")
        }
    }

    #[test]
    fn required_single_valued_becomes_foreign_key() {
        let plan = plan_relation(&slot(true, false), Path::new("Dataset.csv"), "creator*", &target(), naming());

        assert_eq!(plan.value_url.as_deref(), Some("https://w3id.org/example/{+creator}"));
        let Enforcement::Declarative(fk) = plan.enforcement else {
            panic!("expected declarative foreign key");
        };
        assert_eq!(fk.column_reference, "creator");
        assert_eq!(fk.reference.resource, "../Person.csv");
        assert_eq!(fk.reference.column_reference, "id");
    }

    #[test]
    fn optional_single_valued_becomes_manual_check() {
        let plan = plan_relation(&slot(false, false), Path::new("Dataset.csv"), "creator", &target(), naming());

        let Enforcement::Manual(check) = plan.enforcement else {
            panic!("expected manual check");
        };
        assert_eq!(check.child_column, "creator");
        assert_eq!(check.parent_column, "id*");
        assert_eq!(check.separator, None);
        assert!(plan.separator.is_none());
    }

    #[test]
    fn multivalued_is_manual_regardless_of_required() {
        for required in [true, false] {
            let plan = plan_relation(&slot(required, true), Path::new("Dataset.csv"), "creators", &target(), naming());

            assert!(plan.value_url.is_none());
            assert_eq!(plan.separator.as_deref(), Some("|"));
            let datatype = plan.datatype.expect("marker datatype");
            assert_eq!(datatype.id.as_deref(), Some("https://w3id.org/example/ConvertIdToNode"));
            let Enforcement::Manual(check) = plan.enforcement else {
                panic!("expected manual check");
            };
            assert_eq!(check.separator.as_deref(), Some("|"));
            assert_eq!(check.parent_table, PathBuf::from("Person.csv"));
        }
    }
}
