use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current contract version for `foreign-keys.plan.json`.
pub const PLAN_VERSION: &str = "0.1";

/// Executable plan of deferred foreign-key checks.
///
/// Every path is relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckPlan {
    pub plan_version: String,
    /// Directory holding the per-task logs.
    pub validation_dir: PathBuf,
    /// One task per child table, ordered by child table path.
    pub tasks: Vec<CheckTask>,
}

/// All checks whose child column lives in one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckTask {
    /// Child table file stem, e.g. `Dataset`.
    pub name: String,
    pub child_table: PathBuf,
    /// Distinct parent tables referenced by the steps, sorted.
    pub depends_on: Vec<PathBuf>,
    /// Receives the output of every failing step; truncated when the task starts.
    pub error_log: PathBuf,
    /// Touched only when no step failed.
    pub success_log: PathBuf,
    pub steps: Vec<CheckStep>,
}

/// One (child column, parent column) membership check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckStep {
    pub child_column: String,
    pub parent_table: PathBuf,
    pub parent_column: String,
    /// Splits multivalued child cells. Absent for single-valued columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}
