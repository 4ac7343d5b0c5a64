use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default ceiling on closure passes.
pub const DEFAULT_CLOSURE_ITERATION_LIMIT: usize = 1000;

/// Set of table paths a class needs loaded to resolve its relations.
pub type DependencySet = BTreeSet<PathBuf>;

/// Summary of a closure run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureReport {
    /// Passes performed, including the final pass that changed nothing.
    pub passes: usize,
}

/// Per-class table dependencies, accumulated while columns are built and
/// closed transitively once every class has been seen.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Own table path of every registered class.
    tables: BTreeMap<String, PathBuf>,
    dependencies: BTreeMap<String, DependencySet>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class's own table. A class always depends on itself.
    pub fn register_table(&mut self, class_name: &str, table: &Path) {
        self.tables
            .insert(class_name.to_string(), table.to_path_buf());
        self.dependencies
            .entry(class_name.to_string())
            .or_default()
            .insert(table.to_path_buf());
    }

    /// Record a direct dependency on a class table or a synthetic table.
    pub fn add_dependency(&mut self, class_name: &str, table: &Path) {
        self.dependencies
            .entry(class_name.to_string())
            .or_default()
            .insert(table.to_path_buf());
    }

    pub fn table(&self, class_name: &str) -> Option<&Path> {
        self.tables.get(class_name).map(PathBuf::as_path)
    }

    pub fn dependencies(&self, class_name: &str) -> Option<&DependencySet> {
        self.dependencies.get(class_name)
    }

    /// Iterate `(class, dependencies)` in class-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DependencySet)> {
        self.dependencies
            .iter()
            .map(|(name, deps)| (name.as_str(), deps))
    }

    /// Close every dependency set under transitivity.
    ///
    /// Each pass unions, for every class, the dependency sets of the classes
    /// owning the tables it already depends on. The run stops after a pass
    /// that adds nothing. Cycles converge because sets only grow and are
    /// bounded by the number of tables; `iteration_limit` turns a run that
    /// keeps changing into [`Error::ClosureDivergence`].
    pub fn close(&mut self, iteration_limit: usize) -> Result<ClosureReport> {
        let owners: BTreeMap<PathBuf, String> = self
            .tables
            .iter()
            .map(|(class, path)| (path.clone(), class.clone()))
            .collect();
        let class_names: Vec<String> = self.dependencies.keys().cloned().collect();

        let mut passes = 0;
        loop {
            passes += 1;
            if passes > iteration_limit {
                return Err(Error::ClosureDivergence {
                    iterations: iteration_limit,
                });
            }

            let mut changed = false;
            for class_name in &class_names {
                let unmet = self.unmet_transitive_dependencies(class_name, &owners);
                if !unmet.is_empty() {
                    changed = true;
                    if let Some(deps) = self.dependencies.get_mut(class_name) {
                        deps.extend(unmet);
                    }
                }
            }

            if !changed {
                return Ok(ClosureReport { passes });
            }
        }
    }

    fn unmet_transitive_dependencies(
        &self,
        class_name: &str,
        owners: &BTreeMap<PathBuf, String>,
    ) -> DependencySet {
        let Some(current) = self.dependencies.get(class_name) else {
            return DependencySet::new();
        };

        let mut reachable = DependencySet::new();
        for owner in current.iter().filter_map(|path| owners.get(path)) {
            if let Some(deps) = self.dependencies.get(owner) {
                reachable.extend(deps.iter().cloned());
            }
        }

        reachable.difference(current).cloned().collect()
    }
}
