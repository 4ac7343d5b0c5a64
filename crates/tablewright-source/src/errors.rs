use std::path::PathBuf;

use tablewright_core::ValidationReport;
use thiserror::Error;

/// Errors raised while loading a schema document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported schema document format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },
    #[error("invalid schema document: {0}")]
    Invalid(ValidationReport),
}

pub type Result<T> = std::result::Result<T, SourceError>;
