use std::path::PathBuf;
use thiserror::Error;

/// Failure of the persistence medium behind a [`crate::PolicyAdapter`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("policy file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("policy line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        StoreError::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from read operations and enforcement.
///
/// A request that matches no rule is a deny decision, never an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("reload failed: {0}")]
    Store(#[from] StoreError),
}

/// Errors from role-assignment mutations.
#[derive(Debug, Error)]
pub enum AssignError {
    #[error("reload failed: {0}")]
    Store(#[from] StoreError),
    #[error("subject {subject} has no role in domain {domain}")]
    NotFound { subject: String, domain: String },
    /// The in-memory snapshot was changed but could not be written back. The
    /// durable state is unchanged and the next reload discards the mutation.
    #[error("mutation applied in memory but persist failed: {0}")]
    PersistenceAfterMutation(#[source] StoreError),
}

/// Caller-side precondition failures, raised before the engine is invoked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("role must be one of {}", allowed.join(", "))]
    RoleNotAllowed { role: String, allowed: Vec<String> },
}
