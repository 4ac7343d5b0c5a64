use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for running a check plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPlanOptions {
    /// Root every plan path is relative to.
    pub data_dir: PathBuf,
    /// Missing values listed per failure in the markdown report.
    pub max_examples: usize,
}

impl Default for RunPlanOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            max_examples: 20,
        }
    }
}

/// Outcome of one list-column membership check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub child_table: PathBuf,
    pub child_column: String,
    pub parent_table: PathBuf,
    pub parent_column: String,
    /// Child values absent from the parent column, sorted.
    pub missing: Vec<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(
                f,
                "All values found in {}['{}'] appear to be valid.",
                self.child_table.display(),
                self.child_column
            );
        }
        write!(
            f,
            "Unexpected values found in {}['{}'] but not in {}['{}']:",
            self.child_table.display(),
            self.child_column,
            self.parent_table.display(),
            self.parent_column
        )?;
        for value in &self.missing {
            write!(f, "\n'{value}'")?;
        }
        Ok(())
    }
}

/// A step that could not pass, either through missing values or because
/// a table could not be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepFailure {
    pub child_column: String,
    pub parent_table: PathBuf,
    pub parent_column: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Text appended to the task's error log.
    pub message: String,
}

/// Result of one check task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub name: String,
    pub child_table: PathBuf,
    pub steps: usize,
    pub failures: Vec<StepFailure>,
    pub error_log: PathBuf,
    pub success_log: PathBuf,
}

impl TaskOutcome {
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of a whole plan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRunReport {
    pub run_id: String,
    pub tasks: Vec<TaskOutcome>,
    pub duration_ms: u64,
}

impl PlanRunReport {
    pub fn failed_tasks(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.tasks.iter().filter(|task| !task.passed())
    }

    pub fn passed(&self) -> bool {
        self.tasks.iter().all(TaskOutcome::passed)
    }
}

/// Result of assembling a unioned identifier table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnionReport {
    pub output: PathBuf,
    pub sources: usize,
    pub identifiers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_lists_each_missing_value() {
        let outcome = CheckOutcome {
            child_table: PathBuf::from("Dataset.csv"),
            child_column: "Keywords".to_string(),
            parent_table: PathBuf::from("Keyword.csv"),
            parent_column: "id*".to_string(),
            missing: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            outcome.to_string(),
            "Unexpected values found in Dataset.csv['Keywords'] but not in Keyword.csv['id*']:\n'a'\n'b'"
        );
    }
}
