use std::path::{Component, Path, PathBuf};

use crate::model::GenerateOptions;

/// Reference document written at the output root.
pub const CLASS_DESCRIPTIONS_FILE: &str = "class-descriptions.md";
pub const PLAN_FILE: &str = "foreign-keys.plan.json";
pub const MAKEFILE_FILE: &str = "foreign-keys.mk";

/// Where every artifact lives, relative to the output root.
#[derive(Debug, Clone)]
pub struct Layout {
    remote_dir: PathBuf,
    validation_dir: PathBuf,
}

impl Layout {
    pub fn new(options: &GenerateOptions) -> Self {
        Self {
            remote_dir: options.remote_dir.clone(),
            validation_dir: options.validation_dir.clone(),
        }
    }

    pub fn remote_dir(&self) -> &Path {
        &self.remote_dir
    }

    pub fn validation_dir(&self) -> &Path {
        &self.validation_dir
    }

    pub fn csv_path(&self, class_name: &str) -> PathBuf {
        PathBuf::from(format!("{class_name}.csv"))
    }

    pub fn schema_path(&self, class_name: &str) -> PathBuf {
        self.remote_dir.join(format!("{class_name}.schema.json"))
    }

    pub fn metadata_path(&self, class_name: &str) -> PathBuf {
        self.remote_dir.join(format!("{class_name}.csv-metadata.json"))
    }

    pub fn remote_file(&self, file_name: &str) -> PathBuf {
        self.remote_dir.join(file_name)
    }

    pub fn plan_path(&self) -> PathBuf {
        self.remote_file(PLAN_FILE)
    }

    pub fn makefile_path(&self) -> PathBuf {
        self.remote_file(MAKEFILE_FILE)
    }

    pub fn descriptions_path(&self) -> PathBuf {
        PathBuf::from(CLASS_DESCRIPTIONS_FILE)
    }

    /// URL of `target` as seen from a document inside the remote directory.
    pub fn url_from_remote(&self, target: &Path) -> String {
        relative_url(&self.remote_dir, target)
    }
}

/// Relative, `/`-separated URL from directory `from` to `target`. Both paths
/// are relative to the same root.
pub fn relative_url(from: &Path, target: &Path) -> String {
    let from = normal_components(from);
    let target = normal_components(target);

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_string(), from.len() - common));
    parts.extend(target[common..].iter().cloned());
    parts.join("/")
}

/// True when `path` is absolute or climbs above the root it is relative to.
/// Documents in such a directory have no relative URL to the output root.
pub fn escapes_root(path: &Path) -> bool {
    path.has_root() || normal_components(path).first().is_some_and(|part| part == "..")
}

/// Lexically normalised components. `..` cancels a preceding name; leading
/// `..` entries are kept.
fn normal_components(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else {
                    parts.push("..".to_string());
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_walk_up_out_of_remote_dir() {
        let layout = Layout::new(&GenerateOptions::default());
        assert_eq!(layout.url_from_remote(Path::new("Person.csv")), "../Person.csv");
        assert_eq!(
            layout.url_from_remote(&layout.schema_path("Person")),
            "Person.schema.json"
        );
        assert_eq!(
            layout.url_from_remote(Path::new("out/validation/agents.csv")),
            "../out/validation/agents.csv"
        );
    }

    #[test]
    fn nested_remote_dir() {
        assert_eq!(
            relative_url(Path::new("a/b"), Path::new("a/c/file.csv")),
            "../c/file.csv"
        );
        assert_eq!(relative_url(Path::new("."), Path::new("x.csv")), "x.csv");
    }

    #[test]
    fn targets_above_the_root_keep_their_parent_steps() {
        assert_eq!(
            relative_url(Path::new("remote"), Path::new("../shared/agents.csv")),
            "../../shared/agents.csv"
        );
        assert_eq!(
            relative_url(Path::new("remote"), Path::new("a/../../b.csv")),
            "../../b.csv"
        );
    }

    #[test]
    fn remote_dirs_outside_the_root_are_detected() {
        assert!(escapes_root(Path::new("../remote")));
        assert!(escapes_root(Path::new("docs/../../remote")));
        assert!(escapes_root(Path::new("/srv/remote")));
        assert!(!escapes_root(Path::new("remote")));
        assert!(!escapes_root(Path::new("docs/../remote")));
    }
}
