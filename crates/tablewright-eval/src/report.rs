use crate::model::PlanRunReport;

/// Render a deterministic markdown summary of a plan run.
pub fn render_report(report: &PlanRunReport, max_examples: usize) -> String {
    let mut lines = Vec::new();

    lines.push("# Foreign Key Check Report".to_string());
    lines.push(String::new());
    lines.push("## Run summary".to_string());
    lines.push(format!("- run_id: {}", report.run_id));
    lines.push(format!("- tasks: {}", report.tasks.len()));
    lines.push(format!("- failed: {}", report.failed_tasks().count()));
    lines.push(String::new());

    lines.push("## Tasks".to_string());
    lines.push("| task | child_table | steps | failures | status |".to_string());
    lines.push("| --- | --- | --- | --- | --- |".to_string());
    for task in &report.tasks {
        lines.push(format!(
            "| {} | {} | {} | {} | {} |",
            task.name,
            task.child_table.display(),
            task.steps,
            task.failures.len(),
            if task.passed() { "pass" } else { "fail" }
        ));
    }
    lines.push(String::new());

    let failed: Vec<_> = report.failed_tasks().collect();
    if !failed.is_empty() {
        lines.push("## Failures".to_string());
        for task in failed {
            for failure in &task.failures {
                let shown: Vec<String> = failure
                    .missing
                    .iter()
                    .take(max_examples)
                    .map(|value| format!("`{value}`"))
                    .collect();
                let detail = if failure.missing.is_empty() {
                    failure.message.clone()
                } else if failure.missing.len() > shown.len() {
                    format!(
                        "missing {} (+{} more)",
                        shown.join(", "),
                        failure.missing.len() - shown.len()
                    )
                } else {
                    format!("missing {}", shown.join(", "))
                };
                lines.push(format!(
                    "- {}['{}'] -> {}['{}']: {}",
                    task.child_table.display(),
                    failure.child_column,
                    failure.parent_table.display(),
                    failure.parent_column,
                    detail
                ));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
