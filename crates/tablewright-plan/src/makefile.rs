use crate::model::{CheckPlan, CheckStep, CheckTask};

/// Make variable expected to hold the list-column check command.
pub const CHECK_COMMAND_VARIABLE: &str = "LIST_COLUMN_FOREIGN_KEY_CHECK";

/// Render the plan as make rules, one rule per task whose target is the
/// task's success marker.
pub fn render_makefile(plan: &CheckPlan) -> String {
    let success_logs: Vec<String> = plan
        .tasks
        .iter()
        .map(|task| task.success_log.display().to_string())
        .collect();
    let error_logs: Vec<String> = plan
        .tasks
        .iter()
        .map(|task| task.error_log.display().to_string())
        .collect();

    let mut lines = Vec::new();
    lines.push(format!(
        "MANUAL_FOREIGN_KEY_VALIDATION_LOGS\t\t\t:= {}",
        success_logs.join(" ")
    ));
    lines.push(format!(
        "MANUAL_FOREIGN_KEY_VALIDATION_LOGS_ERRORS\t:= {}",
        error_logs.join(" ")
    ));

    for task in &plan.tasks {
        lines.push(String::new());
        push_task(&mut lines, task, plan);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_task(lines: &mut Vec<String>, task: &CheckTask, plan: &CheckPlan) {
    let success = task.success_log.display();
    let error = task.error_log.display();
    let prerequisites: Vec<String> = task
        .depends_on
        .iter()
        .map(|path| path.display().to_string())
        .collect();

    lines.push(format!(
        "{success}: {} {}",
        prerequisites.join(" "),
        plan.validation_dir.display()
    ));
    lines.push(format!("\t@rm -f \"{error}\" \"{success}\""));
    for step in &task.steps {
        push_step(lines, task, step);
    }
    lines.push(format!("\t@if [ -f \"{error}\" ]; then \\"));
    lines.push("\t   echo \"\"; \\".to_string());
    lines.push("\t   echo \"Foreign Key errors detected:\"; \\".to_string());
    lines.push(format!("\t   cat \"{error}\"; \\"));
    lines.push("\t else \\".to_string());
    lines.push(format!("\t   touch \"{success}\"; \\"));
    lines.push("\t fi".to_string());
    lines.push("\t@echo \"\"".to_string());
}

fn push_step(lines: &mut Vec<String>, task: &CheckTask, step: &CheckStep) {
    let child = task.child_table.display();
    let mut command = format!(
        "$({CHECK_COMMAND_VARIABLE}) \"{child}\" \"{}\" \"{}\" \"{}\"",
        step.child_column,
        step.parent_table.display(),
        step.parent_column
    );
    if let Some(separator) = &step.separator {
        command.push_str(&format!(" --separator \"{separator}\""));
    }

    lines.push(format!(
        "\t@echo \"=============== Validating values in {child}['{}'] ===============\"",
        step.child_column
    ));
    lines.push(format!(
        "\t@RES=$$({command}) && echo \"$$RES\" || echo \"$$RES\" >> \"{}\"",
        task.error_log.display()
    ));
}
