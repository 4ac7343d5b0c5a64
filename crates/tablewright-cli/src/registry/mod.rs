//! Per-invocation run directories.
//!
//! Every command gets `runs/<timestamp>__run_<id>/` holding `config.json`
//! (options, input fingerprint, git state), `logs.ndjson` and the command's
//! report.

mod logging;
mod run;

use std::path::PathBuf;

use thiserror::Error;

pub use logging::init_run_logging;
pub use run::{RunContext, RunPaths, start_run, write_markdown, write_report};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot fingerprint input {}: {source}", path.display())]
    Input {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
