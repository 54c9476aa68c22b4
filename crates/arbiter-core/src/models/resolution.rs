use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::conflict::ConflictRecord;
use super::constraint::Constraint;

/// Summary counts of one resolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionSummary {
    pub total_declared: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub total_conflicts: usize,
    pub total_unresolved: usize,
    pub resolved_at: DateTime<Utc>,
}

/// Output of `resolve_constraints`. Unresolved conflicts are always present
/// in `conflicts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub resolved_set: Vec<Constraint>,
    pub conflicts: Vec<ConflictRecord>,
    pub rejected_ids: Vec<String>,
    pub metadata: ResolutionSummary,
}

impl ResolutionReport {
    /// Conflicts that must be surfaced for external adjudication.
    pub fn unresolved(&self) -> impl Iterator<Item = &ConflictRecord> {
        self.conflicts
            .iter()
            .filter(|c| c.resolution == super::conflict::Resolution::Unresolved)
    }
}

/// A session's constraint list moved out of the active store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintArchive {
    pub archive_id: String,
    pub session_id: String,
    pub archived_at: DateTime<Utc>,
    pub constraints: Vec<Constraint>,
    /// Last resolution computed for the archived list, if any.
    pub resolution: Option<ResolutionReport>,
}
