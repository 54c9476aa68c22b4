//! Corruption-tolerant reads.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use arbiter_core::models::{DiagnosticKind, StateDiagnostic};
use serde::de::DeserializeOwned;

/// Collects diagnostics raised while recovering persisted state.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Mutex<Vec<StateDiagnostic>>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, diagnostic: StateDiagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }

    pub fn drain(&self) -> Vec<StateDiagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Read and parse a JSON file, falling back to `T::default()`.
///
/// A missing file is normal (cold start or a read racing the first write) and
/// is not reported. Anything else is logged and recorded.
pub fn read_json_or_default<T>(path: &Path, log: &DiagnosticLog) -> T
where
    T: DeserializeOwned + Default,
{
    read_json(path, log).unwrap_or_default()
}

/// Like [`read_json_or_default`] but distinguishes "nothing usable" as `None`.
pub fn read_json<T: DeserializeOwned>(path: &Path, log: &DiagnosticLog) -> Option<T> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file unreadable, treating as empty");
            log.record(StateDiagnostic::new(
                DiagnosticKind::Unreadable,
                path.display().to_string(),
                e.to_string(),
            ));
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "state file corrupt, treating as empty");
            log.record(StateDiagnostic::new(
                DiagnosticKind::Corrupt,
                path.display().to_string(),
                e.to_string(),
            ));
            None
        }
    }
}
