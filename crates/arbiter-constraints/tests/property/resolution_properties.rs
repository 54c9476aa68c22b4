//! Property tests: detection symmetry and resolver soundness.

use arbiter_constraints::{detect_and_resolve, ConflictDetector};
use arbiter_core::models::{Constraint, ConstraintType, Priority, Resolution};
use proptest::prelude::*;

const TARGETS: &[&str] = &["storage-engine", "eviction-policy", "consistency-model"];
const VALUES: &[&str] = &["lsm", "btree", "lru", "strong consistency", "low write latency"];

fn constraints_strategy() -> impl Strategy<Value = Vec<Constraint>> {
    proptest::collection::vec(
        (
            proptest::sample::select(TARGETS),
            proptest::sample::select(VALUES),
            any::<bool>(),
        ),
        0..7,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (target, value, hard))| {
                let priority = if hard { Priority::Hard } else { Priority::Soft };
                Constraint::new(format!("c{i}"), "prop", ConstraintType::Requires, target, value, priority)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn detection_ignores_declaration_order(constraints in constraints_strategy()) {
        let detector = ConflictDetector::with_builtin_rules().unwrap();
        let mut reversed = constraints.clone();
        reversed.reverse();

        let mut forward: Vec<String> = detector.detect(&constraints).into_iter().map(|c| c.conflict_id).collect();
        let mut backward: Vec<String> = detector.detect(&reversed).into_iter().map(|c| c.conflict_id).collect();
        forward.sort();
        backward.sort();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn resolver_only_rejects_soft_losers(constraints in constraints_strategy()) {
        let detector = ConflictDetector::with_builtin_rules().unwrap();
        let report = detect_and_resolve(&detector, &constraints);

        for conflict in &report.conflicts {
            let a = constraints.iter().find(|c| c.id == conflict.constraint_a_id).unwrap();
            let b = constraints.iter().find(|c| c.id == conflict.constraint_b_id).unwrap();
            match conflict.resolution {
                Resolution::AcceptA => {
                    prop_assert!(a.priority.is_hard() && !b.priority.is_hard());
                    prop_assert!(report.rejected_ids.contains(&b.id));
                    prop_assert!(!report.rejected_ids.contains(&a.id));
                }
                Resolution::AcceptB => {
                    prop_assert!(b.priority.is_hard() && !a.priority.is_hard());
                    prop_assert!(report.rejected_ids.contains(&a.id));
                    prop_assert!(!report.rejected_ids.contains(&b.id));
                }
                Resolution::Unresolved => prop_assert!(!conflict.auto_resolvable),
            }
        }
        for id in &report.rejected_ids {
            let c = constraints.iter().find(|c| &c.id == id).unwrap();
            prop_assert_eq!(c.priority, Priority::Soft);
        }
        prop_assert_eq!(report.metadata.accepted, report.resolved_set.len());
        prop_assert_eq!(report.metadata.accepted + report.metadata.rejected, constraints.len());
    }
}
