/// Persisted-state errors. Reads never produce these (corrupt or missing
/// files recover to empty state); writes do.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("serialization failed for {path}: {message}")]
    Serialization { path: String, message: String },

    #[error("atomic write failed for {path}: {message}")]
    AtomicWriteFailed { path: String, message: String },
}

impl StorageError {
    /// File the failed write was aimed at.
    pub fn path(&self) -> &str {
        match self {
            Self::Io { path, .. }
            | Self::Serialization { path, .. }
            | Self::AtomicWriteFailed { path, .. } => path,
        }
    }
}
