use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tablewright_core::ManualForeignKeyCheck;

use crate::model::{CheckPlan, CheckStep, CheckTask, PLAN_VERSION};

const LOG_SUFFIX: &str = "-csv-list-column-foreign-key";

/// Group deferred checks by child table into an executable plan.
///
/// Steps keep the order the checks were registered in; tasks are ordered by
/// child table path.
pub fn build_plan(checks: &[ManualForeignKeyCheck], validation_dir: &Path) -> CheckPlan {
    let mut by_child: BTreeMap<&Path, Vec<&ManualForeignKeyCheck>> = BTreeMap::new();
    for check in checks {
        by_child
            .entry(check.child_table.as_path())
            .or_default()
            .push(check);
    }

    let tasks = by_child
        .into_iter()
        .map(|(child_table, checks)| build_task(child_table, &checks, validation_dir))
        .collect();

    CheckPlan {
        plan_version: PLAN_VERSION.to_string(),
        validation_dir: validation_dir.to_path_buf(),
        tasks,
    }
}

fn build_task(
    child_table: &Path,
    checks: &[&ManualForeignKeyCheck],
    validation_dir: &Path,
) -> CheckTask {
    let depends_on: BTreeSet<&Path> = checks
        .iter()
        .map(|check| check.parent_table.as_path())
        .collect();

    CheckTask {
        name: table_stem(child_table),
        child_table: child_table.to_path_buf(),
        depends_on: depends_on.into_iter().map(Path::to_path_buf).collect(),
        error_log: error_log_path(child_table, validation_dir),
        success_log: success_log_path(child_table, validation_dir),
        steps: checks
            .iter()
            .map(|check| CheckStep {
                child_column: check.child_column.clone(),
                parent_table: check.parent_table.clone(),
                parent_column: check.parent_column.clone(),
                separator: check.separator.clone(),
            })
            .collect(),
    }
}

/// `<validation_dir>/<Stem>-csv-list-column-foreign-key.success.log`
pub fn success_log_path(child_table: &Path, validation_dir: &Path) -> PathBuf {
    validation_dir.join(format!("{}{LOG_SUFFIX}.success.log", table_stem(child_table)))
}

/// `<validation_dir>/<Stem>-csv-list-column-foreign-key.err.log`
pub fn error_log_path(child_table: &Path, validation_dir: &Path) -> PathBuf {
    validation_dir.join(format!("{}{LOG_SUFFIX}.err.log", table_stem(child_table)))
}

fn table_stem(table: &Path) -> String {
    table
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(child: &str, column: &str, parent: &str, separator: Option<&str>) -> ManualForeignKeyCheck {
        ManualForeignKeyCheck {
            child_table: PathBuf::from(child),
            child_column: column.to_string(),
            parent_table: PathBuf::from(parent),
            parent_column: "id*".to_string(),
            separator: separator.map(str::to_string),
        }
    }

    #[test]
    fn two_children_sharing_a_parent_get_independent_tasks() {
        let checks = vec![
            check("Dataset.csv", "creators", "Person.csv", Some("|")),
            check("Grant.csv", "holder", "Person.csv", None),
        ];
        let plan = build_plan(&checks, Path::new("out/validation"));

        assert_eq!(plan.tasks.len(), 2);
        for task in &plan.tasks {
            assert_eq!(task.depends_on, vec![PathBuf::from("Person.csv")]);
            assert_eq!(task.steps.len(), 1);
        }
        assert_eq!(plan.tasks[0].name, "Dataset");
        assert_eq!(plan.tasks[1].name, "Grant");
        assert_eq!(plan.tasks[0].steps[0].separator.as_deref(), Some("|"));
        assert_eq!(plan.tasks[1].steps[0].separator, None);
    }

    #[test]
    fn steps_of_one_child_are_grouped_with_distinct_parents() {
        let checks = vec![
            check("Dataset.csv", "creators", "Person.csv", Some("|")),
            check("Dataset.csv", "funders", "out/validation/agents.csv", Some("|")),
            check("Dataset.csv", "contacts", "Person.csv", Some("|")),
        ];
        let plan = build_plan(&checks, Path::new("out/validation"));

        assert_eq!(plan.tasks.len(), 1);
        let task = &plan.tasks[0];
        let columns: Vec<&str> = task.steps.iter().map(|s| s.child_column.as_str()).collect();
        assert_eq!(columns, vec!["creators", "funders", "contacts"]);
        assert_eq!(
            task.depends_on,
            vec![
                PathBuf::from("Person.csv"),
                PathBuf::from("out/validation/agents.csv")
            ]
        );
    }

    #[test]
    fn log_paths_follow_child_table_stem() {
        let dir = Path::new("out/validation");
        assert_eq!(
            success_log_path(Path::new("Dataset.csv"), dir),
            PathBuf::from("out/validation/Dataset-csv-list-column-foreign-key.success.log")
        );
        assert_eq!(
            error_log_path(Path::new("Dataset.csv"), dir),
            PathBuf::from("out/validation/Dataset-csv-list-column-foreign-key.err.log")
        );
    }

    #[test]
    fn no_checks_means_empty_plan() {
        let plan = build_plan(&[], Path::new("out/validation"));
        assert!(plan.tasks.is_empty());
        assert_eq!(plan.plan_version, PLAN_VERSION);
    }
}
