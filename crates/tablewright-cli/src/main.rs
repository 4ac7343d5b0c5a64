mod config;
mod registry;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use tablewright_eval::{
    EvalError, PlanRunner, RunPlanOptions, check_list_column, load_plan, render_report,
    union_identifiers,
};
use tablewright_generate::{GenerationEngine, GenerationError};
use tablewright_source::{SourceError, load_schema};

use config::{DEFAULT_CONFIG_FILE, load_options};
use registry::{RunContext, RunPaths, init_run_logging, start_run, write_markdown, write_report};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "tablewright", version, about = "Compile class schemas into CSV table templates")]
struct Cli {
    /// Configuration file with generator options.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Directory receiving one sub-directory per run.
    #[arg(long, global = true, default_value = "runs")]
    run_dir: PathBuf,
    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a schema document into CSV templates and table schemas.
    Generate(GenerateArgs),
    /// Check one list column against a parent table column.
    Check(CheckArgs),
    /// Run every task of a manual foreign-key check plan.
    CheckPlan(CheckPlanArgs),
    /// Union the first column of several tables into one identifier table.
    UnionIds(UnionIdsArgs),
    /// Print the JSON Schema of an input contract.
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Schema document (YAML or JSON).
    schema: PathBuf,
    /// Output root, overriding the configuration file.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Serialize)]
struct CheckArgs {
    child_table: PathBuf,
    child_column: String,
    parent_table: PathBuf,
    parent_column: String,
    /// Separates the values inside a child cell.
    #[arg(long, short, default_value = "|")]
    separator: String,
}

#[derive(Args, Debug, Serialize)]
struct CheckPlanArgs {
    /// Plan document, e.g. `remote/foreign-keys.plan.json`.
    plan: PathBuf,
    /// Root the plan's paths are relative to.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    /// Missing values listed per failure in the report.
    #[arg(long, default_value_t = 20)]
    max_examples: usize,
}

#[derive(Args, Debug, Serialize)]
struct UnionIdsArgs {
    /// Tables whose first column holds identifiers.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    #[arg(long, short)]
    out: PathBuf,
    /// Header of the output column.
    #[arg(long, default_value = "Permanent Identifier*")]
    id_title: String,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    kind: SchemaKind,
    /// Write to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SchemaKind {
    Model,
    Plan,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let Cli {
        config,
        run_dir,
        verbose,
        command,
    } = cli;

    match command {
        Command::Generate(args) => run_generate(args, &config, run_dir, verbose),
        Command::Check(args) => run_check(args, run_dir, verbose),
        Command::CheckPlan(args) => run_check_plan(args, run_dir, verbose),
        Command::UnionIds(args) => run_union_ids(args, run_dir, verbose),
        Command::Schema(args) => run_schema(args),
    }
}

fn begin_run(
    command: &str,
    run_dir: PathBuf,
    input: Option<&Path>,
    options: &impl Serialize,
    verbose: bool,
) -> Result<RunPaths, CliError> {
    let run_id = Uuid::new_v4().to_string();
    let ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: command.to_string(),
        run_dir,
        input: input.map(Path::to_path_buf),
        options: serde_json::to_value(options)?,
    };

    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path, verbose)?;
    tracing::info!(event = "run_started", run_id = %run_id, command);
    Ok(paths)
}

fn run_generate(
    args: GenerateArgs,
    config: &Path,
    run_dir: PathBuf,
    verbose: bool,
) -> Result<ExitCode, CliError> {
    let mut options = load_options(config)?;
    if let Some(out_dir) = args.out_dir {
        options.out_dir = out_dir;
    }

    let paths = begin_run("generate", run_dir, Some(args.schema.as_path()), &options, verbose)?;
    let timer = Instant::now();

    let model = load_schema(&args.schema)?;
    tracing::info!(event = "schema_loaded", schema = %model.name, classes = model.classes.len());

    let result = GenerationEngine::new(options).run(&model)?;
    write_report(&paths, &result.report)?;

    println!(
        "generated {} table(s), {} check task(s), {} file(s) under {}",
        result.report.tables.len(),
        result.report.check_tasks,
        result.report.files.len(),
        result.out_dir.display()
    );

    tracing::info!(
        event = "run_finished",
        status = "success",
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(ExitCode::SUCCESS)
}

fn run_check(args: CheckArgs, run_dir: PathBuf, verbose: bool) -> Result<ExitCode, CliError> {
    let paths = begin_run("check", run_dir, None, &args, verbose)?;

    let outcome = check_list_column(
        &args.child_table,
        &args.child_column,
        &args.parent_table,
        &args.parent_column,
        Some(args.separator.as_str()),
    )?;
    write_report(&paths, &outcome)?;
    println!("{outcome}");

    if outcome.passed() {
        tracing::info!(event = "run_finished", status = "success");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(event = "run_finished", status = "failed", missing = outcome.missing.len());
        Ok(ExitCode::FAILURE)
    }
}

fn run_check_plan(
    args: CheckPlanArgs,
    run_dir: PathBuf,
    verbose: bool,
) -> Result<ExitCode, CliError> {
    let paths = begin_run("check-plan", run_dir, Some(args.plan.as_path()), &args, verbose)?;

    let (plan, warnings) = load_plan(&args.plan)?;
    for warning in &warnings {
        tracing::warn!(event = "plan_warning", warning = %warning);
    }

    let runner = PlanRunner::new(RunPlanOptions {
        data_dir: args.data_dir,
        max_examples: args.max_examples,
    });
    let report = runner.run(&plan)?;
    write_report(&paths, &report)?;
    let markdown_path = write_markdown(
        &paths,
        "check_report.md",
        &render_report(&report, args.max_examples),
    )?;

    for task in &report.tasks {
        for failure in &task.failures {
            println!("{}", failure.message);
        }
    }
    let failed = report.failed_tasks().count();
    println!(
        "{} of {} task(s) passed; report at {}",
        report.tasks.len() - failed,
        report.tasks.len(),
        markdown_path.display()
    );

    if failed == 0 {
        tracing::info!(event = "run_finished", status = "success");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(event = "run_finished", status = "failed", failed_tasks = failed);
        Ok(ExitCode::FAILURE)
    }
}

fn run_union_ids(args: UnionIdsArgs, run_dir: PathBuf, verbose: bool) -> Result<ExitCode, CliError> {
    let paths = begin_run("union-ids", run_dir, None, &args, verbose)?;

    let report = union_identifiers(&args.inputs, &args.out, &args.id_title)?;
    write_report(&paths, &report)?;
    println!(
        "{} identifier(s) from {} table(s) written to {}",
        report.identifiers,
        report.sources,
        report.output.display()
    );

    tracing::info!(event = "run_finished", status = "success");
    Ok(ExitCode::SUCCESS)
}

fn run_schema(args: SchemaArgs) -> Result<ExitCode, CliError> {
    let schema = match args.kind {
        SchemaKind::Model => serde_json::to_string_pretty(&tablewright_core::model_json_schema())?,
        SchemaKind::Plan => serde_json::to_string_pretty(&tablewright_plan::plan_json_schema())?,
    };

    match args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, format!("{schema}\n"))?;
        }
        None => println!("{schema}"),
    }
    Ok(ExitCode::SUCCESS)
}
