//! ConstraintStore — append-only, session-scoped list of constraints.
//!
//! Constraints only leave the store through `archive_and_reset`.

use std::collections::HashSet;
use std::sync::Arc;

use arbiter_core::errors::{ArbiterResult, ConstraintError};
use arbiter_core::models::{Constraint, ConstraintArchive, RawConstraint, ResolutionReport};
use arbiter_core::traits::IStateStore;
use chrono::Utc;

pub struct ConstraintStore {
    session_id: String,
    constraints: Vec<Constraint>,
    state: Arc<dyn IStateStore>,
    archive_retention: usize,
}

impl std::fmt::Debug for ConstraintStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintStore")
            .field("session_id", &self.session_id)
            .field("constraints", &self.constraints.len())
            .field("archive_retention", &self.archive_retention)
            .finish()
    }
}

impl ConstraintStore {
    /// Load the session's active list. Persisted records that no longer
    /// validate, or repeat an id, are dropped with a warning.
    pub fn open(
        session_id: impl Into<String>,
        state: Arc<dyn IStateStore>,
        archive_retention: usize,
    ) -> Self {
        let session_id = session_id.into();
        let mut seen = HashSet::new();
        let constraints = state
            .load_constraints(&session_id)
            .into_iter()
            .filter(|c| match c.validate() {
                Ok(()) if seen.insert(c.id.clone()) => true,
                Ok(()) => {
                    tracing::warn!(session_id = %session_id, id = %c.id, "dropping duplicate persisted constraint");
                    false
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id, error = %e, "dropping invalid persisted constraint");
                    false
                }
            })
            .collect();
        Self {
            session_id,
            constraints,
            state,
            archive_retention: archive_retention.max(1),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Current ordered list.
    pub fn snapshot(&self) -> Vec<Constraint> {
        self.constraints.clone()
    }

    /// Validate and append. The list is persisted before the call returns;
    /// on a write failure the append is rolled back.
    pub fn append(&mut self, constraint: Constraint) -> ArbiterResult<()> {
        constraint.validate()?;
        if self.constraints.iter().any(|c| c.id == constraint.id) {
            return Err(ConstraintError::DuplicateId { id: constraint.id }.into());
        }
        let id = constraint.id.clone();
        self.constraints.push(constraint);
        if let Err(e) = self.state.save_constraints(&self.session_id, &self.constraints) {
            self.constraints.pop();
            return Err(e.into());
        }
        tracing::debug!(session_id = %self.session_id, id = %id, total = self.constraints.len(), "appended constraint");
        Ok(())
    }

    pub fn append_raw(&mut self, raw: RawConstraint) -> ArbiterResult<()> {
        let constraint = Constraint::try_from(raw)?;
        self.append(constraint)
    }

    /// Move the active list into a persisted archive and clear the store.
    /// Returns `None` when there was nothing to archive.
    pub fn archive_and_reset(
        &mut self,
        resolution: Option<ResolutionReport>,
    ) -> ArbiterResult<Option<ConstraintArchive>> {
        if self.constraints.is_empty() {
            return Ok(None);
        }
        let archive = ConstraintArchive {
            archive_id: uuid::Uuid::new_v4().to_string(),
            session_id: self.session_id.clone(),
            archived_at: Utc::now(),
            constraints: self.constraints.clone(),
            resolution,
        };
        self.state.save_archive(&archive, self.archive_retention)?;
        self.state.save_constraints(&self.session_id, &[])?;
        self.constraints.clear();
        tracing::info!(
            session_id = %self.session_id,
            archive_id = %archive.archive_id,
            constraints = archive.constraints.len(),
            "archived constraint set"
        );
        Ok(Some(archive))
    }

    /// Archived sets, oldest first.
    pub fn archives(&self) -> Vec<ConstraintArchive> {
        self.state.list_archives(&self.session_id)
    }
}
