use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use crate::checks::read_first_column;
use crate::errors::EvalError;
use crate::model::UnionReport;

/// Union the first column of every input into a sorted, de-duplicated
/// single-column table titled `id_title`. Blank identifiers are dropped.
pub fn union_identifiers(
    inputs: &[PathBuf],
    output: &Path,
    id_title: &str,
) -> Result<UnionReport, EvalError> {
    let mut identifiers = BTreeSet::new();
    for input in inputs {
        identifiers.extend(
            read_first_column(input)?
                .into_iter()
                .filter(|value| !value.trim().is_empty()),
        );
    }

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(output)?;
    writer.write_record([id_title])?;
    for identifier in &identifiers {
        writer.write_record([identifier])?;
    }
    writer.flush()?;

    info!(
        output = %output.display(),
        sources = inputs.len(),
        identifiers = identifiers.len(),
        "identifier table assembled"
    );

    Ok(UnionReport {
        output: output.to_path_buf(),
        sources: inputs.len(),
        identifiers: identifiers.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_sorts_and_dedups_first_columns() {
        let dir = std::env::temp_dir().join(format!("tablewright_union_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let people = dir.join("Person.csv");
        let orgs = dir.join("Organization.csv");
        fs::write(&people, "id*,name\nhttps://ex.org/p2,Bo\nhttps://ex.org/p1,Al\n").expect("write");
        fs::write(&orgs, "id*\nhttps://ex.org/o1\nhttps://ex.org/p1\n\n").expect("write");

        let output = dir.join("out/validation/agents.csv");
        let report = union_identifiers(&[people, orgs], &output, "Permanent Identifier*")
            .expect("union");

        assert_eq!(report.identifiers, 3);
        assert_eq!(
            fs::read_to_string(&output).expect("read output"),
            "Permanent Identifier*\nhttps://ex.org/o1\nhttps://ex.org/p1\nhttps://ex.org/p2\n"
        );
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_input_is_an_invalid_table() {
        let output = std::env::temp_dir().join(format!("tablewright_union_{}.csv", uuid::Uuid::new_v4()));
        let err = union_identifiers(&[PathBuf::from("/nonexistent/input.csv")], &output, "id")
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidTable { .. }));
        assert!(!output.exists());
    }
}
