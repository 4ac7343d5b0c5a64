use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use tablewright_core::{ForeignKeyConstraint, ManualForeignKeyCheck, SchemaView};

use crate::layout::Layout;
use crate::model::{GenerateOptions, SyntheticTable};

/// Read-only inputs shared by every class of a compile run.
pub struct CompileContext<'a> {
    pub view: &'a SchemaView<'a>,
    pub options: &'a GenerateOptions,
    pub layout: &'a Layout,
    synthetic: HashMap<&'a str, &'a SyntheticTable>,
}

impl<'a> CompileContext<'a> {
    pub fn new(view: &'a SchemaView<'a>, options: &'a GenerateOptions, layout: &'a Layout) -> Self {
        let synthetic = options
            .synthetic_tables
            .iter()
            .map(|table| (table.name.as_str(), table))
            .collect();
        Self {
            view,
            options,
            layout,
            synthetic,
        }
    }

    pub fn synthetic_table(&self, name: &str) -> Option<&'a SyntheticTable> {
        self.synthetic.get(name).copied()
    }

    pub fn namespace(&self) -> &'a str {
        &self.options.identifier_namespace
    }

    /// `<ns>{+slot}`: the identifier-keyed URI template of a row.
    pub fn row_template(&self, identifier_slot: &str) -> String {
        format!("{}{{+{identifier_slot}}}", self.namespace())
    }
}

/// State accumulated while one class's columns are built.
#[derive(Debug, Clone, Default)]
pub struct ClassAccumulator {
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
    pub manual_checks: Vec<ManualForeignKeyCheck>,
    /// Own table plus every directly referenced table.
    pub dependencies: BTreeSet<PathBuf>,
}
