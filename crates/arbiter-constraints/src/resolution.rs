//! Priority-based conflict resolution.
//!
//! Hard beats soft. Everything else is left for external adjudication and
//! always surfaced in the report.

use std::collections::HashSet;

use arbiter_core::constants::{RATIONALE_HARD_OVER_SOFT, RATIONALE_NEEDS_ADJUDICATION};
use arbiter_core::models::{
    ConflictRecord, ConflictTier, Constraint, ResolutionReport, ResolutionSummary, Resolution,
};
use chrono::{DateTime, Utc};

/// Settle `conflicts` against the declared `constraints`.
pub fn resolve(
    constraints: &[Constraint],
    conflicts: Vec<ConflictRecord>,
    now: DateTime<Utc>,
) -> ResolutionReport {
    let mut rejected: HashSet<String> = HashSet::new();
    let conflicts: Vec<ConflictRecord> = conflicts
        .into_iter()
        .map(|conflict| settle(conflict, constraints, &mut rejected))
        .collect();

    let (resolved_set, rejected_set): (Vec<Constraint>, Vec<Constraint>) = constraints
        .iter()
        .cloned()
        .partition(|c| !rejected.contains(&c.id));
    let rejected_ids: Vec<String> = rejected_set.into_iter().map(|c| c.id).collect();
    let total_unresolved = conflicts
        .iter()
        .filter(|c| c.resolution == Resolution::Unresolved)
        .count();

    let metadata = ResolutionSummary {
        total_declared: constraints.len(),
        accepted: resolved_set.len(),
        rejected: rejected_ids.len(),
        total_conflicts: conflicts.len(),
        total_unresolved,
        resolved_at: now,
    };
    tracing::info!(
        declared = metadata.total_declared,
        accepted = metadata.accepted,
        rejected = metadata.rejected,
        conflicts = metadata.total_conflicts,
        unresolved = metadata.total_unresolved,
        "resolved constraints"
    );

    ResolutionReport {
        resolved_set,
        conflicts,
        rejected_ids,
        metadata,
    }
}

fn settle(
    mut conflict: ConflictRecord,
    constraints: &[Constraint],
    rejected: &mut HashSet<String>,
) -> ConflictRecord {
    let priority_of = |id: &str| constraints.iter().find(|c| c.id == id).map(|c| c.priority);
    let a_hard = priority_of(&conflict.constraint_a_id).is_some_and(|p| p.is_hard());
    let b_hard = priority_of(&conflict.constraint_b_id).is_some_and(|p| p.is_hard());

    if conflict.auto_resolvable && a_hard != b_hard {
        let (resolution, loser) = if a_hard {
            (Resolution::AcceptA, conflict.constraint_b_id.clone())
        } else {
            (Resolution::AcceptB, conflict.constraint_a_id.clone())
        };
        conflict.resolution = resolution;
        conflict.rationale = RATIONALE_HARD_OVER_SOFT.to_string();
        rejected.insert(loser);
        return conflict;
    }

    conflict.resolution = Resolution::Unresolved;
    conflict.rationale = match conflict.tier {
        ConflictTier::Semantic if !conflict.rationale.is_empty() => {
            format!("{}; {}", conflict.rationale, RATIONALE_NEEDS_ADJUDICATION)
        }
        _ => RATIONALE_NEEDS_ADJUDICATION.to_string(),
    };
    conflict
}
