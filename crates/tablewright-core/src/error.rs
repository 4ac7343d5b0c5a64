use thiserror::Error;

/// Core error type shared across tablewright crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema violates a structural invariant (unresolved names, wrong
    /// identifier count, unsupported type or slot configuration).
    #[error("schema integrity error: {0}")]
    SchemaIntegrity(String),
    /// The dependency closure kept changing past the configured pass limit.
    #[error("dependency closure did not converge within {iterations} passes")]
    ClosureDivergence { iterations: usize },
}

impl Error {
    pub fn integrity(message: impl Into<String>) -> Self {
        Error::SchemaIntegrity(message.into())
    }
}

/// Convenience alias for results returned by tablewright crates.
pub type Result<T> = std::result::Result<T, Error>;
