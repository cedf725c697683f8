//! Error types for the log store.

use thiserror::Error;

/// Boxed error returned by an [`Executor`](crate::executor::Executor).
pub type ExecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in the log store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store or translator target is not usable.
    #[error("configuration error: {0}")]
    Config(String),

    /// A query criterion or an argument holds an invalid value.
    #[error("validation error: {0}")]
    Validation(String),

    /// A statement could not be rendered for the target dialect.
    #[error("translation error: {0}")]
    Translation(String),

    /// The underlying statement failed to run.
    #[error("execution error: {0}")]
    Execution(#[source] ExecError),

    /// The database returned a value the store cannot interpret.
    #[error("unexpected result: {0}")]
    UnexpectedResult(String),
}

impl StoreError {
    /// Wraps any executor failure as an execution error.
    pub fn execution(err: impl Into<ExecError>) -> Self {
        Self::Execution(err.into())
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is a translation error.
    #[must_use]
    pub const fn is_translation(&self) -> bool {
        matches!(self, Self::Translation(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::execution(err)
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
