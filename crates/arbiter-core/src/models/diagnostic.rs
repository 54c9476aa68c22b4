use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What went wrong with a piece of persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File unreadable (other than simply absent).
    Unreadable,
    /// File present but not well-formed; treated as empty.
    Corrupt,
    /// A best-effort write failed; in-memory state is still current.
    WriteFailed,
}

/// Non-fatal persisted-state problem recovered by the engine, kept for the
/// orchestration layer to surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDiagnostic {
    pub kind: DiagnosticKind,
    pub path: String,
    pub detail: String,
    pub observed_at: DateTime<Utc>,
}

impl StateDiagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            detail: detail.into(),
            observed_at: Utc::now(),
        }
    }
}
