//! Constraint store and conflict pipeline: golden scenarios, validation,
//! archival.

use std::sync::Arc;

use arbiter_constraints::{detect_and_resolve, ConflictDetector, ConstraintStore};
use arbiter_core::errors::{ArbiterError, ConstraintError};
use arbiter_core::models::{Constraint, ConstraintType, Priority, RawConstraint};
use arbiter_core::traits::IStateStore;
use arbiter_storage::InMemoryStateStore;
use serde_json::Value;
use test_fixtures::{list_fixtures, load_fixture_value};

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

fn constraint(id: &str, target: &str, value: &str, priority: Priority) -> Constraint {
    Constraint::new(id, "review", ConstraintType::Requires, target, value, priority)
}

// ═══════════════════════════════════════════════════════════════════════════
// GOLDEN SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn golden_conflict_scenarios() {
    let detector = ConflictDetector::with_builtin_rules().unwrap();
    let files = list_fixtures("golden/conflicts");
    assert!(!files.is_empty());

    for path in files {
        let relative = format!(
            "golden/conflicts/{}",
            path.file_name().unwrap().to_string_lossy()
        );
        let fixture = load_fixture_value(&relative);
        let raws: Vec<RawConstraint> =
            serde_json::from_value(fixture["input"]["constraints"].clone()).unwrap();
        let constraints: Vec<Constraint> = raws
            .into_iter()
            .map(|r| Constraint::try_from(r).unwrap())
            .collect();

        let report = detect_and_resolve(&detector, &constraints);
        let expected = &fixture["expected"];

        let expected_conflicts = expected["conflicts"].as_array().unwrap();
        assert_eq!(report.conflicts.len(), expected_conflicts.len(), "{relative}");
        for (got, want) in report.conflicts.iter().zip(expected_conflicts) {
            let got_json = serde_json::to_value(got).unwrap();
            assert_eq!(got.constraint_a_id, want["a"].as_str().unwrap(), "{relative}");
            assert_eq!(got.constraint_b_id, want["b"].as_str().unwrap(), "{relative}");
            assert_eq!(got_json["tier"], want["tier"], "{relative}");
            assert_eq!(got_json["type"], want["type"], "{relative}");
            assert_eq!(got_json["resolution"], want["resolution"], "{relative}");
            assert_eq!(got.auto_resolvable, want["auto_resolvable"].as_bool().unwrap(), "{relative}");
        }

        let resolved: Vec<String> = report.resolved_set.iter().map(|c| c.id.clone()).collect();
        assert_eq!(resolved, strings(&expected["resolved_ids"]), "{relative}");
        assert_eq!(report.rejected_ids, strings(&expected["rejected_ids"]), "{relative}");
        assert_eq!(
            report.metadata.total_unresolved as u64,
            expected["total_unresolved"].as_u64().unwrap(),
            "{relative}"
        );
    }
}

#[test]
fn semantic_rationale_keeps_rule_text() {
    let detector = ConflictDetector::with_builtin_rules().unwrap();
    let constraints = vec![
        constraint("C1", "consistency-model", "strong consistency", Priority::Hard),
        constraint("C2", "write-path", "low write latency", Priority::Soft),
    ];
    let report = detect_and_resolve(&detector, &constraints);
    assert_eq!(report.conflicts.len(), 1);
    let conflict = &report.conflicts[0];
    assert!(!conflict.auto_resolvable, "semantic conflicts are never auto-resolved");
    assert!(conflict.rationale.starts_with("strongly consistent writes"));
    assert!(conflict.rationale.ends_with("requires external/human adjudication"));
    assert_eq!(report.resolved_set.len(), 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// STORE
// ═══════════════════════════════════════════════════════════════════════════

fn store() -> (ConstraintStore, Arc<InMemoryStateStore>) {
    let state = Arc::new(InMemoryStateStore::new());
    (ConstraintStore::open("s1", state.clone(), 3), state)
}

#[test]
fn append_persists_in_order() {
    let (mut store, state) = store();
    store.append(constraint("a", "t", "1", Priority::Hard)).unwrap();
    store.append(constraint("b", "t", "2", Priority::Soft)).unwrap();
    let ids: Vec<String> = state.load_constraints("s1").into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(store.snapshot().len(), 2);
}

#[test]
fn duplicate_id_rejected() {
    let (mut store, _) = store();
    store.append(constraint("a", "t", "1", Priority::Hard)).unwrap();
    let err = store.append(constraint("a", "t", "2", Priority::Soft)).unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Constraint(ConstraintError::DuplicateId { .. })
    ));
    assert_eq!(store.len(), 1);
}

#[test]
fn raw_with_unknown_priority_rejected() {
    let (mut store, _) = store();
    let raw = RawConstraint {
        id: "r1".into(),
        source: "review".into(),
        constraint_type: "requires".into(),
        target: "t".into(),
        value: "v".into(),
        priority: "urgent".into(),
        impacts: None,
    };
    let err = store.append_raw(raw).unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Constraint(ConstraintError::InvalidPriority { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn missing_value_rejected() {
    let (mut store, _) = store();
    let err = store.append(constraint("a", "t", "", Priority::Hard)).unwrap_err();
    assert!(matches!(
        err,
        ArbiterError::Constraint(ConstraintError::MissingField { field: "value", .. })
    ));
}

#[test]
fn archive_moves_everything_out() {
    let (mut store, state) = store();
    store.append(constraint("a", "t", "1", Priority::Hard)).unwrap();
    let archive = store.archive_and_reset(None).unwrap().unwrap();
    assert_eq!(archive.constraints.len(), 1);
    assert!(store.is_empty());
    assert!(state.load_constraints("s1").is_empty());
    assert_eq!(store.archives().len(), 1);

    // Ids can be reused after a reset.
    store.append(constraint("a", "t", "1", Priority::Hard)).unwrap();
}

#[test]
fn archiving_an_empty_store_is_a_noop() {
    let (mut store, _) = store();
    assert!(store.archive_and_reset(None).unwrap().is_none());
    assert!(store.archives().is_empty());
}

#[test]
fn archive_retention_is_rolling() {
    let (mut store, _) = store();
    for round in 0..5 {
        store
            .append(constraint(&format!("r{round}"), "t", "v", Priority::Soft))
            .unwrap();
        store.archive_and_reset(None).unwrap();
    }
    let archives = store.archives();
    assert_eq!(archives.len(), 3);
    assert_eq!(archives[0].constraints[0].id, "r2");
}

#[test]
fn reopen_restores_active_list() {
    let state = Arc::new(InMemoryStateStore::new());
    {
        let mut store = ConstraintStore::open("s1", state.clone(), 3);
        store.append(constraint("a", "t", "1", Priority::Hard)).unwrap();
    }
    let store = ConstraintStore::open("s1", state, 3);
    assert_eq!(store.len(), 1);
}
