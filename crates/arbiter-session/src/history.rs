//! SessionHistory — bounded, append-only log of completed classifications.

use arbiter_core::config::SessionConfig;
use arbiter_core::models::{ClassificationResult, SessionHistoryEntry};
use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionHistory {
    entries: Vec<SessionHistoryEntry>,
    max_entries: usize,
    keep: usize,
}

impl SessionHistory {
    pub fn new(config: &SessionConfig) -> Self {
        Self::from_entries(Vec::new(), config)
    }

    /// Rebuild from persisted entries. Entries are re-sorted by timestamp and
    /// trimmed if the bound shrank since they were written.
    pub fn from_entries(mut entries: Vec<SessionHistoryEntry>, config: &SessionConfig) -> Self {
        entries.sort_by_key(|e| e.timestamp);
        let max_entries = config.history_max_entries.max(1);
        let keep = ((max_entries as f64 * config.history_keep_ratio).floor() as usize)
            .clamp(1, max_entries);
        let mut history = Self {
            entries,
            max_entries,
            keep,
        };
        history.trim();
        history
    }

    /// Append an entry. Returns true when the log was trimmed.
    pub fn append(&mut self, entry: SessionHistoryEntry) -> bool {
        self.entries.push(entry);
        self.trim()
    }

    fn trim(&mut self) -> bool {
        if self.entries.len() <= self.max_entries {
            return false;
        }
        let dropped = self.entries.len() - self.keep;
        self.entries.drain(..dropped);
        tracing::debug!(dropped, kept = self.keep, "trimmed session history");
        true
    }

    /// Oldest first.
    pub fn entries(&self) -> &[SessionHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&SessionHistoryEntry> {
        self.entries.last()
    }

    pub fn read_recent(&self, n: usize, window_minutes: i64) -> Vec<&SessionHistoryEntry> {
        self.read_recent_at(Utc::now(), n, window_minutes)
    }

    /// Up to `n` entries no older than `window_minutes` before `now`, most
    /// recent first. A window too wide to represent has no cutoff.
    pub fn read_recent_at(
        &self,
        now: DateTime<Utc>,
        n: usize,
        window_minutes: i64,
    ) -> Vec<&SessionHistoryEntry> {
        let cutoff = TimeDelta::try_minutes(window_minutes)
            .and_then(|window| now.checked_sub_signed(window));
        self.entries
            .iter()
            .rev()
            .filter(|e| cutoff.map_or(true, |cutoff| e.timestamp >= cutoff))
            .take(n)
            .collect()
    }

    /// Most recent entry recorded under `signature`.
    pub fn find_latest(&self, signature: &str) -> Option<&SessionHistoryEntry> {
        self.entries.iter().rev().find(|e| e.signature == signature)
    }

    /// Entries with `signature` whose classification equals `result`'s.
    pub fn count_matching(&self, signature: &str, result: &ClassificationResult) -> usize {
        self.entries
            .iter()
            .filter(|e| e.signature == signature && e.result.same_classification(result))
            .count()
    }
}
