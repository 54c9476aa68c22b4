use crate::errors::StorageError;
use crate::models::{
    Constraint, ConstraintArchive, PatternCacheEntry, SessionHistoryEntry, StateDiagnostic,
    TransitionRecord,
};

/// Persisted engine state.
///
/// Loads never fail: a missing file is empty state, and an unreadable or
/// malformed file is empty state plus a [`StateDiagnostic`]. Saves replace
/// the stored value atomically, so a concurrent load sees either the old or
/// the new value in full.
pub trait IStateStore: Send + Sync {
    // --- Session history ---
    fn load_history(&self, session_id: &str) -> Vec<SessionHistoryEntry>;
    fn save_history(
        &self,
        session_id: &str,
        entries: &[SessionHistoryEntry],
    ) -> Result<(), StorageError>;

    // --- Transition table ---
    fn load_transitions(&self, session_id: &str) -> Vec<TransitionRecord>;
    fn save_transitions(
        &self,
        session_id: &str,
        records: &[TransitionRecord],
    ) -> Result<(), StorageError>;

    // --- Pattern cache (process-wide) ---
    fn load_pattern_cache(&self) -> Vec<PatternCacheEntry>;
    fn save_pattern_cache(&self, entries: &[PatternCacheEntry]) -> Result<(), StorageError>;

    // --- Constraints ---
    fn load_constraints(&self, session_id: &str) -> Vec<Constraint>;
    fn save_constraints(
        &self,
        session_id: &str,
        constraints: &[Constraint],
    ) -> Result<(), StorageError>;

    /// Store an archive and prune the oldest beyond `retention`.
    fn save_archive(
        &self,
        archive: &ConstraintArchive,
        retention: usize,
    ) -> Result<(), StorageError>;

    /// Archives for a session, oldest first.
    fn list_archives(&self, session_id: &str) -> Vec<ConstraintArchive>;

    /// Take the diagnostics accumulated since the last call.
    fn drain_diagnostics(&self) -> Vec<StateDiagnostic>;
}
