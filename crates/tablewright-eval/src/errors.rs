use std::path::PathBuf;

use thiserror::Error;

use tablewright_core::ValidationReport;

/// Errors emitted by the check runner and table assembly.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid table {path}: {message}")]
    InvalidTable { path: PathBuf, message: String },
    #[error("invalid plan: {0}")]
    InvalidPlan(ValidationReport),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvalError {
    pub(crate) fn invalid_table(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EvalError::InvalidTable {
            path: path.into(),
            message: message.into(),
        }
    }
}
