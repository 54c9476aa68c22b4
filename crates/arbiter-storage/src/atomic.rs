//! Write-to-temp-then-rename.

use std::io::Write;
use std::path::Path;

use arbiter_core::errors::StorageError;
use serde::Serialize;
use tempfile::NamedTempFile;

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialization {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    write_atomic(path, &bytes)
}

/// Atomically replace `path` with `bytes`. The temporary file is created in
/// the destination directory so the final rename never crosses filesystems.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let parent = path.parent().ok_or_else(|| StorageError::AtomicWriteFailed {
        path: path.display().to_string(),
        message: "path has no parent directory".to_string(),
    })?;
    std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| io_error(parent, e))?;
    temp.write_all(bytes).map_err(|e| io_error(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| io_error(temp.path(), e))?;
    temp.persist(path)
        .map_err(|e| StorageError::AtomicWriteFailed {
            path: path.display().to_string(),
            message: e.error.to_string(),
        })?;
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
