use std::path::{Path, PathBuf};

use tablewright_plan::{
    ManualForeignKeyCheck, build_plan, plan_json_schema, validate_plan, validate_plan_json,
};

fn plan_schema_json() -> serde_json::Value {
    serde_json::to_value(plan_json_schema()).expect("serialize plan schema")
}

fn sample_checks() -> Vec<ManualForeignKeyCheck> {
    vec![
        ManualForeignKeyCheck {
            child_table: PathBuf::from("Dataset.csv"),
            child_column: "creators".to_string(),
            parent_table: PathBuf::from("Person.csv"),
            parent_column: "id*".to_string(),
            separator: Some("|".to_string()),
        },
        ManualForeignKeyCheck {
            child_table: PathBuf::from("Grant.csv"),
            child_column: "holder".to_string(),
            parent_table: PathBuf::from("Person.csv"),
            parent_column: "id*".to_string(),
            separator: None,
        },
    ]
}

#[test]
fn built_plan_validates_against_schema() {
    let plan = build_plan(&sample_checks(), Path::new("out/validation"));
    let plan_json = serde_json::to_value(&plan).expect("serialize plan");
    let schema = plan_schema_json();

    let structural = validate_plan_json(&plan_json, &schema).expect("validate plan json schema");
    assert!(structural.errors.is_empty(), "structural errors found");

    let validated = validate_plan(&plan_json, &schema).expect("plan validation should succeed");
    assert!(validated.warnings.is_empty(), "unexpected warnings");
    assert_eq!(validated.plan, plan);
}

#[test]
fn missing_dependency_is_reported() {
    let plan = build_plan(&sample_checks(), Path::new("out/validation"));
    let mut plan_json = serde_json::to_value(&plan).expect("serialize plan");
    plan_json["tasks"][0]["depends_on"] = serde_json::json!([]);

    let report = validate_plan(&plan_json, &plan_schema_json()).unwrap_err();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, "undeclared_dependency");
    assert_eq!(report.errors[0].path, "/tasks/0/steps/0/parent_table");
}

#[test]
fn structural_errors_stop_before_semantics() {
    let document = serde_json::json!({"plan_version": "0.1", "tasks": "nope"});
    let report = validate_plan(&document, &plan_schema_json()).unwrap_err();
    assert!(report.errors.iter().all(|issue| issue.code == "schema_violation"));
}
