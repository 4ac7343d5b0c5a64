use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use jsonschema::JSONSchema;
use serde_json::Value;
use tablewright_core::normalized_json_pointer;

use crate::errors::{IssueSeverity, PlanError, ValidationIssue, ValidationReport};
use crate::model::{CheckPlan, PLAN_VERSION};

/// Validated plan with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    pub plan: CheckPlan,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a plan JSON document against the plan JSON Schema.
pub fn validate_plan_json(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidationReport, PlanError> {
    let compiled =
        JSONSchema::compile(plan_schema).map_err(|err| PlanError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(plan_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Check the semantic invariants a structurally valid plan must hold.
pub fn validate_plan_model(plan: &CheckPlan) -> ValidationReport {
    let mut report = ValidationReport::default();

    if plan.plan_version != PLAN_VERSION {
        report.push_warning(ValidationIssue::new(
            IssueSeverity::Warning,
            "plan_version_mismatch",
            "/plan_version",
            format!(
                "plan version '{}' differs from supported version '{PLAN_VERSION}'",
                plan.plan_version
            ),
            None,
        ));
    }

    let mut child_tables = HashSet::new();
    let mut logs = HashSet::new();

    for (index, task) in plan.tasks.iter().enumerate() {
        let base = format!("/tasks/{index}");

        if !child_tables.insert(&task.child_table) {
            report.push_error(ValidationIssue::new(
                IssueSeverity::Error,
                "duplicate_child_table",
                format!("{base}/child_table"),
                format!(
                    "child table '{}' has more than one task",
                    task.child_table.display()
                ),
                Some("merge the steps into a single task".to_string()),
            ));
        }

        for (field, log) in [("error_log", &task.error_log), ("success_log", &task.success_log)] {
            if !logs.insert(log) {
                report.push_error(ValidationIssue::error(
                    "duplicate_log_path",
                    format!("{base}/{field}"),
                    format!("log path '{}' is used by more than one task", log.display()),
                ));
            }
        }

        if task.steps.is_empty() {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "empty_task",
                format!("{base}/steps"),
                format!("task '{}' has no steps", task.name),
                None,
            ));
        }

        let referenced: BTreeSet<&PathBuf> = task.steps.iter().map(|s| &s.parent_table).collect();
        let declared: BTreeSet<&PathBuf> = task.depends_on.iter().collect();

        for (step_index, step) in task.steps.iter().enumerate() {
            if !declared.contains(&step.parent_table) {
                report.push_error(ValidationIssue::new(
                    IssueSeverity::Error,
                    "undeclared_dependency",
                    format!("{base}/steps/{step_index}/parent_table"),
                    format!(
                        "parent table '{}' is not listed in depends_on",
                        step.parent_table.display()
                    ),
                    Some("add the parent table to depends_on".to_string()),
                ));
            }
            if step.separator.as_deref() == Some("") {
                report.push_error(ValidationIssue::error(
                    "empty_separator",
                    format!("{base}/steps/{step_index}/separator"),
                    "separator must not be empty",
                ));
            }
        }

        for extra in declared.difference(&referenced) {
            report.push_warning(ValidationIssue::new(
                IssueSeverity::Warning,
                "unused_dependency",
                format!("{base}/depends_on"),
                format!("'{}' is not referenced by any step", extra.display()),
                None,
            ));
        }
    }

    report
}

/// Validate the plan end-to-end, returning structured issues on failure.
pub fn validate_plan(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidatedPlan, ValidationReport> {
    let structural = match validate_plan_json(plan_json, plan_schema) {
        Ok(report) => report,
        Err(err) => {
            return Err(ValidationReport::single(ValidationIssue::error(
                "schema_validation_error",
                "/",
                err.to_string(),
            )));
        }
    };

    if !structural.is_ok() {
        return Err(structural);
    }

    let plan: CheckPlan = match serde_json::from_value(plan_json.clone()) {
        Ok(plan) => plan,
        Err(err) => {
            return Err(ValidationReport::single(ValidationIssue::error(
                "invalid_plan_json",
                "/",
                err.to_string(),
            )));
        }
    };

    let semantic = validate_plan_model(&plan);
    if !semantic.is_ok() {
        return Err(semantic);
    }

    Ok(ValidatedPlan {
        plan,
        warnings: semantic.warnings,
    })
}
