use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use tablewright_plan::{CheckPlan, CheckStep, CheckTask, plan_json_schema, validate_plan};

use crate::checks::check_list_column;
use crate::errors::EvalError;
use crate::model::{PlanRunReport, RunPlanOptions, StepFailure, TaskOutcome};

/// Load and validate a plan document.
pub fn load_plan(path: &Path) -> Result<(CheckPlan, Vec<String>), EvalError> {
    let contents = fs::read_to_string(path)?;
    let plan_json: Value = serde_json::from_str(&contents)?;
    let plan_schema = serde_json::to_value(plan_json_schema())?;

    let validated = validate_plan(&plan_json, &plan_schema).map_err(EvalError::InvalidPlan)?;
    let warnings = validated
        .warnings
        .iter()
        .map(|issue| issue.to_string())
        .collect();
    Ok((validated.plan, warnings))
}

/// Runs every task of a check plan against populated tables.
#[derive(Debug, Clone)]
pub struct PlanRunner {
    options: RunPlanOptions,
}

impl PlanRunner {
    pub fn new(options: RunPlanOptions) -> Self {
        Self { options }
    }

    /// Run every task. A failing task never stops the others; only I/O on
    /// the task logs aborts the run.
    pub fn run(&self, plan: &CheckPlan) -> Result<PlanRunReport, EvalError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4().to_string();
        info!(run_id = %run_id, tasks = plan.tasks.len(), "check plan started");

        let validation_dir = self.resolve(&plan.validation_dir);
        fs::create_dir_all(&validation_dir)?;

        let mut tasks = Vec::with_capacity(plan.tasks.len());
        for task in &plan.tasks {
            tasks.push(self.run_task(task)?);
        }

        let report = PlanRunReport {
            run_id,
            tasks,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            tasks = report.tasks.len(),
            failed = report.failed_tasks().count(),
            duration_ms = report.duration_ms,
            "check plan finished"
        );
        Ok(report)
    }

    fn run_task(&self, task: &CheckTask) -> Result<TaskOutcome, EvalError> {
        let error_log = self.resolve(&task.error_log);
        let success_log = self.resolve(&task.success_log);
        remove_if_exists(&error_log)?;
        remove_if_exists(&success_log)?;

        let child_table = self.resolve(&task.child_table);
        let mut failures = Vec::new();
        for step in &task.steps {
            if let Some(failure) = self.run_step(task, &child_table, step) {
                append_line(&error_log, &failure.message)?;
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            if let Some(parent) = success_log.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&success_log, b"")?;
            info!(task = %task.name, steps = task.steps.len(), "check task passed");
        } else {
            warn!(
                task = %task.name,
                failures = failures.len(),
                error_log = %error_log.display(),
                "check task failed"
            );
        }

        Ok(TaskOutcome {
            name: task.name.clone(),
            child_table: task.child_table.clone(),
            steps: task.steps.len(),
            failures,
            error_log: task.error_log.clone(),
            success_log: task.success_log.clone(),
        })
    }

    fn run_step(&self, task: &CheckTask, child_table: &Path, step: &CheckStep) -> Option<StepFailure> {
        let failure = |missing: Vec<String>, message: String| StepFailure {
            child_column: step.child_column.clone(),
            parent_table: step.parent_table.clone(),
            parent_column: step.parent_column.clone(),
            missing,
            message,
        };

        match check_list_column(
            child_table,
            &step.child_column,
            &self.resolve(&step.parent_table),
            &step.parent_column,
            step.separator.as_deref(),
        ) {
            Ok(outcome) if outcome.passed() => None,
            Ok(outcome) => {
                let message = outcome.to_string();
                Some(failure(outcome.missing, message))
            }
            Err(err) => {
                warn!(task = %task.name, column = %step.child_column, error = %err, "check step errored");
                Some(failure(Vec::new(), err.to_string()))
            }
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.options.data_dir.join(path)
    }
}

fn remove_if_exists(path: &Path) -> Result<(), EvalError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn append_line(path: &Path, message: &str) -> Result<(), EvalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{message}")?;
    Ok(())
}
