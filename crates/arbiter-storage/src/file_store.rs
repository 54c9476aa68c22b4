//! FileStateStore — JSON files under a state directory.

use std::path::{Path, PathBuf};

use arbiter_core::errors::StorageError;
use arbiter_core::models::{
    Constraint, ConstraintArchive, PatternCacheEntry, SessionHistoryEntry, StateDiagnostic,
    TransitionRecord,
};
use arbiter_core::traits::IStateStore;

use crate::atomic::write_json_atomic;
use crate::paths::StatePaths;
use crate::recovery::{read_json, read_json_or_default, DiagnosticLog};

/// File-backed state store. Safe to share across threads; every save is an
/// atomic replace of a single file.
#[derive(Debug)]
pub struct FileStateStore {
    paths: StatePaths,
    diagnostics: DiagnosticLog,
}

impl FileStateStore {
    /// Open (creating if needed) a state directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let paths = StatePaths::new(root);
        std::fs::create_dir_all(paths.root()).map_err(|e| StorageError::Io {
            path: paths.root().display().to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(root = %paths.root().display(), "opened state directory");
        Ok(Self {
            paths,
            diagnostics: DiagnosticLog::new(),
        })
    }

    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    pub fn paths(&self) -> &StatePaths {
        &self.paths
    }

    fn archive_files(&self, session_id: &str) -> Vec<PathBuf> {
        let dir = self.paths.archive_dir(session_id);
        let Ok(read_dir) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = read_dir
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // File names start with a fixed-width UTC timestamp.
        files.sort();
        files
    }
}

impl IStateStore for FileStateStore {
    fn load_history(&self, session_id: &str) -> Vec<SessionHistoryEntry> {
        read_json_or_default(&self.paths.history(session_id), &self.diagnostics)
    }

    fn save_history(
        &self,
        session_id: &str,
        entries: &[SessionHistoryEntry],
    ) -> Result<(), StorageError> {
        write_json_atomic(&self.paths.history(session_id), entries)
    }

    fn load_transitions(&self, session_id: &str) -> Vec<TransitionRecord> {
        read_json_or_default(&self.paths.transitions(session_id), &self.diagnostics)
    }

    fn save_transitions(
        &self,
        session_id: &str,
        records: &[TransitionRecord],
    ) -> Result<(), StorageError> {
        write_json_atomic(&self.paths.transitions(session_id), records)
    }

    fn load_pattern_cache(&self) -> Vec<PatternCacheEntry> {
        read_json_or_default(&self.paths.pattern_cache(), &self.diagnostics)
    }

    fn save_pattern_cache(&self, entries: &[PatternCacheEntry]) -> Result<(), StorageError> {
        write_json_atomic(&self.paths.pattern_cache(), entries)
    }

    fn load_constraints(&self, session_id: &str) -> Vec<Constraint> {
        read_json_or_default(&self.paths.constraints(session_id), &self.diagnostics)
    }

    fn save_constraints(
        &self,
        session_id: &str,
        constraints: &[Constraint],
    ) -> Result<(), StorageError> {
        write_json_atomic(&self.paths.constraints(session_id), constraints)
    }

    fn save_archive(
        &self,
        archive: &ConstraintArchive,
        retention: usize,
    ) -> Result<(), StorageError> {
        let file_name = format!(
            "{}-{}.json",
            archive.archived_at.format("%Y%m%dT%H%M%S%.6fZ"),
            archive.archive_id
        );
        let path = self.paths.archive_dir(&archive.session_id).join(file_name);
        write_json_atomic(&path, archive)?;

        let files = self.archive_files(&archive.session_id);
        let excess = files.len().saturating_sub(retention);
        for stale in files.iter().take(excess) {
            if let Err(e) = std::fs::remove_file(stale) {
                tracing::warn!(path = %stale.display(), error = %e, "failed to prune archive");
            }
        }
        if excess > 0 {
            tracing::debug!(session_id = %archive.session_id, pruned = excess, "pruned constraint archives");
        }
        Ok(())
    }

    fn list_archives(&self, session_id: &str) -> Vec<ConstraintArchive> {
        self.archive_files(session_id)
            .iter()
            .filter_map(|path| read_json::<ConstraintArchive>(path, &self.diagnostics))
            .collect()
    }

    fn drain_diagnostics(&self) -> Vec<StateDiagnostic> {
        self.diagnostics.drain()
    }
}
