use thiserror::Error;

pub use tablewright_core::{IssueSeverity, ValidationIssue, ValidationReport};

/// Plan validation errors that are not structural issues.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema error: {0}")]
    Schema(String),
}

/// Result type for plan validation operations.
pub type Result<T> = std::result::Result<T, PlanError>;
