//! Structural tier: two constraints on the same target with different
//! values.

use arbiter_core::models::{
    ConflictRecord, ConflictTier, ConflictType, Constraint, Resolution,
};

use super::{canonical_pair, conflict_id};

const STRUCTURAL_RULE: &str = "same-target";

/// Pairwise scan. Auto-resolvable iff exactly one side is hard.
pub fn detect_structural(constraints: &[Constraint]) -> Vec<ConflictRecord> {
    let mut conflicts = Vec::new();
    for i in 0..constraints.len() {
        for j in (i + 1)..constraints.len() {
            let (a, b) = canonical_pair(&constraints[i], &constraints[j]);
            if a.target != b.target || a.value == b.value {
                continue;
            }
            let conflict_type = ConflictType::from_priorities(a.priority, b.priority);
            conflicts.push(ConflictRecord {
                conflict_id: conflict_id(ConflictTier::Structural, STRUCTURAL_RULE, &a.id, &b.id),
                constraint_a_id: a.id.clone(),
                constraint_b_id: b.id.clone(),
                tier: ConflictTier::Structural,
                conflict_type,
                auto_resolvable: conflict_type == ConflictType::HardVsSoft,
                resolution: Resolution::Unresolved,
                rationale: format!(
                    "`{}` is {:?} in {} but {:?} in {}",
                    a.target, a.value, a.id, b.value, b.id
                ),
            });
        }
    }
    conflicts
}
