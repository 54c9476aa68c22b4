mod config_error;
mod constraint_error;
mod storage_error;

pub use config_error::ConfigError;
pub use constraint_error::ConstraintError;
pub use storage_error::StorageError;

/// Top-level error for every fallible Arbiter operation.
///
/// Business-level ambiguity (low confidence, unresolved conflicts) is never an
/// error; only contract violations and storage failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    #[error("constraint error: {0}")]
    Constraint(#[from] ConstraintError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("session not found: {0}")]
    SessionNotFound(String),
}

pub type ArbiterResult<T> = Result<T, ArbiterError>;
