use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;

use crate::errors::EvalError;
use crate::model::CheckOutcome;

/// Check that every value of `child_column` in `child_table` appears among
/// the values of `parent_column` in `parent_table`.
///
/// Columns are addressed by their CSV title. With a separator, child cells
/// are split into individual values. Blank values on either side are
/// ignored.
pub fn check_list_column(
    child_table: &Path,
    child_column: &str,
    parent_table: &Path,
    parent_column: &str,
    separator: Option<&str>,
) -> Result<CheckOutcome, EvalError> {
    let parent_values: BTreeSet<String> = read_column(parent_table, parent_column)?
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect();

    let mut missing = BTreeSet::new();
    for cell in read_column(child_table, child_column)? {
        let values: Vec<&str> = match separator {
            Some(separator) if !separator.is_empty() => cell.split(separator).collect(),
            _ => vec![cell.as_str()],
        };
        for value in values {
            if !value.trim().is_empty() && !parent_values.contains(value) {
                missing.insert(value.to_string());
            }
        }
    }

    Ok(CheckOutcome {
        child_table: child_table.to_path_buf(),
        child_column: child_column.to_string(),
        parent_table: parent_table.to_path_buf(),
        parent_column: parent_column.to_string(),
        missing: missing.into_iter().collect(),
    })
}

/// Every cell of the column titled `column`, in row order.
pub fn read_column(path: &Path, column: &str) -> Result<Vec<String>, EvalError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| EvalError::invalid_table(path, err.to_string()))?;

    let index = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| EvalError::invalid_table(path, format!("column '{column}' not found")))?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        values.push(record.get(index).unwrap_or_default().to_string());
    }
    Ok(values)
}

/// Every cell of the first column, in row order.
pub fn read_first_column(path: &Path) -> Result<Vec<String>, EvalError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| EvalError::invalid_table(path, err.to_string()))?;

    if reader.headers()?.is_empty() {
        return Err(EvalError::invalid_table(path, "table has no columns"));
    }

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        values.push(record.get(0).unwrap_or_default().to_string());
    }
    Ok(values)
}
