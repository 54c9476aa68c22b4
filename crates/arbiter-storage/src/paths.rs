//! State directory layout.

use std::path::{Path, PathBuf};

use arbiter_core::constants::{
    ARCHIVE_DIR, CONSTRAINTS_FILE, HISTORY_FILE, PATTERN_CACHE_FILE, SESSIONS_DIR,
    TRANSITIONS_FILE,
};

/// Resolves every persisted file relative to one root directory.
#[derive(Debug, Clone)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern_cache(&self) -> PathBuf {
        self.root.join(PATTERN_CACHE_FILE)
    }

    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.root.join(SESSIONS_DIR).join(sanitize_session_id(session_id))
    }

    pub fn history(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(HISTORY_FILE)
    }

    pub fn transitions(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(TRANSITIONS_FILE)
    }

    pub fn constraints(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(CONSTRAINTS_FILE)
    }

    pub fn archive_dir(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(ARCHIVE_DIR)
    }
}

/// Map a session id onto a safe single path component.
///
/// Ids made only of `[A-Za-z0-9_-]` that do not contain `__` are used as-is.
/// Any other id keeps its cleaned form as a prefix (non-safe characters
/// become `_`, empty becomes `default`) followed by `__` and 16 hex chars of
/// blake3 over the raw id, so distinct ids never share a directory.
pub fn sanitize_session_id(session_id: &str) -> String {
    let verbatim = !session_id.is_empty()
        && !session_id.contains("__")
        && session_id.chars().all(is_safe_char);
    if verbatim {
        return session_id.to_string();
    }

    let cleaned: String = session_id
        .chars()
        .map(|c| if is_safe_char(c) { c } else { '_' })
        .collect();
    let prefix = if cleaned.is_empty() { "default" } else { cleaned.as_str() };
    let hash = blake3::hash(session_id.as_bytes()).to_hex();
    format!("{prefix}__{}", &hash[..16])
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}
