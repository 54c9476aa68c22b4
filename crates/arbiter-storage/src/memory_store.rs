//! InMemoryStateStore — ephemeral state, same contract as the file store.

use std::sync::{PoisonError, RwLock};

use arbiter_core::errors::StorageError;
use arbiter_core::models::{
    Constraint, ConstraintArchive, PatternCacheEntry, SessionHistoryEntry, StateDiagnostic,
    TransitionRecord,
};
use arbiter_core::traits::IStateStore;
use dashmap::DashMap;

/// State store that never touches disk.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    history: DashMap<String, Vec<SessionHistoryEntry>>,
    transitions: DashMap<String, Vec<TransitionRecord>>,
    constraints: DashMap<String, Vec<Constraint>>,
    archives: DashMap<String, Vec<ConstraintArchive>>,
    pattern_cache: RwLock<Vec<PatternCacheEntry>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IStateStore for InMemoryStateStore {
    fn load_history(&self, session_id: &str) -> Vec<SessionHistoryEntry> {
        self.history
            .get(session_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn save_history(
        &self,
        session_id: &str,
        entries: &[SessionHistoryEntry],
    ) -> Result<(), StorageError> {
        self.history.insert(session_id.to_string(), entries.to_vec());
        Ok(())
    }

    fn load_transitions(&self, session_id: &str) -> Vec<TransitionRecord> {
        self.transitions
            .get(session_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn save_transitions(
        &self,
        session_id: &str,
        records: &[TransitionRecord],
    ) -> Result<(), StorageError> {
        self.transitions
            .insert(session_id.to_string(), records.to_vec());
        Ok(())
    }

    fn load_pattern_cache(&self) -> Vec<PatternCacheEntry> {
        self.pattern_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save_pattern_cache(&self, entries: &[PatternCacheEntry]) -> Result<(), StorageError> {
        *self
            .pattern_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner) = entries.to_vec();
        Ok(())
    }

    fn load_constraints(&self, session_id: &str) -> Vec<Constraint> {
        self.constraints
            .get(session_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn save_constraints(
        &self,
        session_id: &str,
        constraints: &[Constraint],
    ) -> Result<(), StorageError> {
        self.constraints
            .insert(session_id.to_string(), constraints.to_vec());
        Ok(())
    }

    fn save_archive(
        &self,
        archive: &ConstraintArchive,
        retention: usize,
    ) -> Result<(), StorageError> {
        let mut entry = self.archives.entry(archive.session_id.clone()).or_default();
        entry.push(archive.clone());
        let excess = entry.len().saturating_sub(retention);
        let kept = entry.split_off(excess);
        *entry = kept;
        Ok(())
    }

    fn list_archives(&self, session_id: &str) -> Vec<ConstraintArchive> {
        self.archives
            .get(session_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn drain_diagnostics(&self) -> Vec<StateDiagnostic> {
        Vec::new()
    }
}
