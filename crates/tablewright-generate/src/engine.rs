use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use tablewright_core::{
    DependencyGraph, ManualForeignKeyCheck, MetadataDocument, SchemaSource, SchemaView,
    TableArtifact, TableSchemaDocument, validate_schema,
};
use tablewright_plan::{CheckPlan, build_plan, render_makefile};

use crate::assembler::{assemble_metadata, synthetic_schema_documents};
use crate::columns::compile_table;
use crate::context::CompileContext;
use crate::docs::render_class_descriptions;
use crate::errors::GenerationError;
use crate::layout::{Layout, escapes_root};
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::output::csv::header_csv;
use crate::output::json::to_pretty_json;
use crate::output::write_bytes_atomic;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub report: GenerationReport,
}

/// Everything a run produces, held in memory until written.
#[derive(Debug, Clone)]
pub struct CompiledArtifacts {
    pub schema_name: String,
    /// Table artifacts in schema enumeration order.
    pub tables: Vec<TableArtifact>,
    /// Aggregate metadata document of each table, parallel to `tables`.
    pub metadata: Vec<MetadataDocument>,
    pub synthetic_schemas: Vec<(PathBuf, TableSchemaDocument)>,
    pub graph: DependencyGraph,
    pub closure_passes: usize,
    pub plan: CheckPlan,
    pub makefile: String,
    pub descriptions: String,
    layout: Layout,
}

impl CompiledArtifacts {
    /// Every manual check, in table order.
    pub fn manual_checks(&self) -> impl Iterator<Item = &ManualForeignKeyCheck> {
        self.tables.iter().flat_map(|table| table.manual_checks.iter())
    }

    pub fn table(&self, class_name: &str) -> Option<&TableArtifact> {
        self.tables.iter().find(|table| table.class_name == class_name)
    }

    pub fn table_reports(&self) -> Vec<TableReport> {
        self.tables
            .iter()
            .map(|table| TableReport {
                class_name: table.class_name.clone(),
                columns: table.schema.columns.iter().filter(|c| !c.is_virtual).count(),
                virtual_columns: table.schema.columns.iter().filter(|c| c.is_virtual).count(),
                foreign_keys: table.schema.foreign_keys.as_ref().map_or(0, Vec::len),
                manual_checks: table.manual_checks.len(),
                dependencies: self
                    .graph
                    .dependencies(&table.class_name)
                    .map_or(0, |deps| deps.len()),
            })
            .collect()
    }

    /// Serialise every artifact to `(path relative to the output root, bytes)`.
    pub fn render(&self) -> Result<Vec<(PathBuf, Vec<u8>)>, GenerationError> {
        let mut files = Vec::with_capacity(self.tables.len() * 3 + 4);

        for (table, metadata) in self.tables.iter().zip(&self.metadata) {
            files.push((table.csv_path.clone(), header_csv(&table.header)?));
            files.push((table.schema_path.clone(), to_pretty_json(&table.schema)?));
            files.push((table.metadata_path.clone(), to_pretty_json(metadata)?));
        }
        for (path, document) in &self.synthetic_schemas {
            files.push((path.clone(), to_pretty_json(document)?));
        }
        files.push((self.layout.plan_path(), to_pretty_json(&self.plan)?));
        files.push((self.layout.makefile_path(), self.makefile.clone().into_bytes()));
        files.push((self.layout.descriptions_path(), self.descriptions.clone().into_bytes()));

        Ok(files)
    }
}

/// Entry point for compiling a schema into table artifacts.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Compile every table class in memory. Nothing touches the filesystem.
    pub fn compile(&self, source: &dyn SchemaSource) -> Result<CompiledArtifacts, GenerationError> {
        if escapes_root(&self.options.remote_dir) {
            return Err(GenerationError::InvalidOptions(format!(
                "remote_dir '{}' must be a relative path inside the output directory",
                self.options.remote_dir.display()
            )));
        }

        let view = SchemaView::new(source)?;
        validate_schema(&view, &self.options.synthetic_names())?;

        let layout = Layout::new(&self.options);
        let ctx = CompileContext::new(&view, &self.options, &layout);

        let mut graph = DependencyGraph::new();
        let mut tables = Vec::new();
        for class in view.table_classes() {
            let compiled = compile_table(&ctx, class)?;
            graph.register_table(&class.name, &compiled.artifact.csv_path);
            for dependency in &compiled.accumulator.dependencies {
                graph.add_dependency(&class.name, dependency);
            }
            info!(
                class = %class.name,
                columns = compiled.artifact.schema.columns.len(),
                manual_checks = compiled.artifact.manual_checks.len(),
                "table compiled"
            );
            tables.push(compiled.artifact);
        }

        let closure = graph.close(self.options.closure_iteration_limit)?;
        info!(passes = closure.passes, classes = tables.len(), "closure converged");

        let metadata = tables
            .iter()
            .map(|table| {
                assemble_metadata(table, &tables, &self.options.synthetic_tables, &graph, &layout)
            })
            .collect();
        let synthetic_schemas = synthetic_schema_documents(
            &self.options.synthetic_tables,
            &self.options.identifier_namespace,
            &layout,
        );

        let checks: Vec<ManualForeignKeyCheck> = tables
            .iter()
            .flat_map(|table| table.manual_checks.iter().cloned())
            .collect();
        let plan = build_plan(&checks, layout.validation_dir());
        let makefile = render_makefile(&plan);
        debug!(tasks = plan.tasks.len(), checks = checks.len(), "check plan built");

        let descriptions = render_class_descriptions(&ctx)?;

        Ok(CompiledArtifacts {
            schema_name: view.name().to_string(),
            tables,
            metadata,
            synthetic_schemas,
            graph,
            closure_passes: closure.passes,
            plan,
            makefile,
            descriptions,
            layout,
        })
    }

    /// Write compiled artifacts under the configured output directory.
    /// Returns the relative paths written and the total byte count.
    pub fn write(
        &self,
        compiled: &CompiledArtifacts,
    ) -> Result<(Vec<PathBuf>, u64), GenerationError> {
        let rendered = compiled.render()?;
        let mut written = Vec::with_capacity(rendered.len());
        let mut bytes_written = 0_u64;

        for (relative, bytes) in rendered {
            let path = self.options.out_dir.join(&relative);
            bytes_written += write_bytes_atomic(&path, &bytes)?;
            debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
            written.push(relative);
        }

        info!(
            out_dir = %self.options.out_dir.display(),
            files = written.len(),
            bytes = bytes_written,
            "artifacts written"
        );
        Ok((written, bytes_written))
    }

    /// Compile, then write. A schema error leaves the output directory untouched.
    pub fn run(&self, source: &dyn SchemaSource) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        info!(
            run_id = %run_id,
            schema = %source.name(),
            classes = source.classes().len(),
            "generation started"
        );

        let compiled = self.compile(source)?;
        let (files, bytes_written) = self.write(&compiled)?;

        let report = GenerationReport {
            run_id,
            schema_name: compiled.schema_name.clone(),
            tables: compiled.table_reports(),
            closure_passes: compiled.closure_passes,
            check_tasks: compiled.plan.tasks.len(),
            files,
            bytes_written,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        Ok(GenerationResult {
            out_dir: self.options.out_dir.clone(),
            report,
        })
    }
}
