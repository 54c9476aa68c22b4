//! File-backed persistence tests: restart survival, corruption recovery,
//! session isolation, archive retention.

use arbiter_core::models::{
    ClassificationResult, ClassifierSource, Constraint, ConstraintArchive, ConstraintType,
    DiagnosticKind, PatternCacheEntry, Priority, SessionHistoryEntry, SystemDomain,
    TransitionRecord,
};
use arbiter_core::traits::IStateStore;
use arbiter_storage::{FileStateStore, InMemoryStateStore};
use chrono::{Duration, Utc};

fn entry(signature: &str) -> SessionHistoryEntry {
    SessionHistoryEntry {
        signature: signature.to_string(),
        result: ClassificationResult::new(
            vec!["storage".into()],
            vec!["indexing".into()],
            0.85,
            ClassifierSource::KeywordFastPath,
        ),
        timestamp: Utc::now(),
        prev_signature: None,
    }
}

fn constraint(id: &str) -> Constraint {
    Constraint::new(
        id,
        "storage-review",
        ConstraintType::Requires,
        "storage-engine",
        "lsm",
        Priority::Hard,
    )
}

fn archive(session: &str, offset_secs: i64) -> ConstraintArchive {
    ConstraintArchive {
        archive_id: uuid::Uuid::new_v4().to_string(),
        session_id: session.to_string(),
        archived_at: Utc::now() + Duration::seconds(offset_secs),
        constraints: vec![constraint(&format!("c{offset_secs}"))],
        resolution: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RESTART SURVIVAL
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStateStore::open(dir.path()).unwrap();
        store
            .save_history("s1", &[entry("composite design index")])
            .unwrap();
    }
    let store = FileStateStore::open(dir.path()).unwrap();
    let history = store.load_history("s1");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].signature, "composite design index");
    assert_eq!(history[0].result.confidence(), 0.85);
}

#[test]
fn pattern_cache_and_transitions_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc::now();
    {
        let store = FileStateStore::open(dir.path()).unwrap();
        store
            .save_pattern_cache(&[PatternCacheEntry {
                signature: "a b".into(),
                result: entry("a b").result,
                hit_count: 3,
                last_used: now,
                promoted_at: now,
            }])
            .unwrap();
        store
            .save_transitions(
                "s1",
                &[TransitionRecord {
                    from: SystemDomain::new("storage", Some("indexing")),
                    to: SystemDomain::new("caching", None::<String>),
                    count: 2,
                    last_seen: now,
                }],
            )
            .unwrap();
    }
    let store = FileStateStore::open(dir.path()).unwrap();
    assert_eq!(store.load_pattern_cache()[0].hit_count, 3);
    assert_eq!(store.load_transitions("s1")[0].count, 2);
}

#[test]
fn constraints_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStateStore::open(dir.path()).unwrap();
        store
            .save_constraints("s1", &[constraint("a"), constraint("b")])
            .unwrap();
    }
    let store = FileStateStore::open(dir.path()).unwrap();
    let ids: Vec<String> = store
        .load_constraints("s1")
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["a", "b"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// RECOVERY: corrupt and missing files are empty state, never errors
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn corrupt_history_recovers_as_empty_with_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    let path = store.paths().history("s1");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"[{\"signature\": truncated").unwrap();

    assert!(store.load_history("s1").is_empty());
    let diags = store.drain_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::Corrupt);
}

#[test]
fn missing_files_are_empty_without_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    assert!(store.load_history("never-seen").is_empty());
    assert!(store.load_pattern_cache().is_empty());
    assert!(store.load_constraints("never-seen").is_empty());
    assert!(store.list_archives("never-seen").is_empty());
    assert!(store.drain_diagnostics().is_empty());
}

#[test]
fn corrupt_cache_recovers_and_next_write_heals() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    std::fs::write(store.paths().pattern_cache(), b"\x00\x01garbage").unwrap();
    assert!(store.load_pattern_cache().is_empty());

    store.save_pattern_cache(&[]).unwrap();
    assert!(store.load_pattern_cache().is_empty());
    assert_eq!(store.drain_diagnostics().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// ISOLATION & ARCHIVES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn sessions_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    store.save_history("alpha", &[entry("x")]).unwrap();
    assert!(store.load_history("beta").is_empty());
    assert_eq!(store.load_history("alpha").len(), 1);
}

#[test]
fn archive_retention_prunes_oldest() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    for offset in 0..5 {
        store.save_archive(&archive("s1", offset), 3).unwrap();
    }
    let archives = store.list_archives("s1");
    assert_eq!(archives.len(), 3);
    let ids: Vec<&str> = archives
        .iter()
        .map(|a| a.constraints[0].id.as_str())
        .collect();
    assert_eq!(ids, vec!["c2", "c3", "c4"]);
}

#[test]
fn in_memory_store_matches_archive_contract() {
    let store = InMemoryStateStore::new();
    for offset in 0..4 {
        store.save_archive(&archive("s1", offset), 2).unwrap();
    }
    let archives = store.list_archives("s1");
    assert_eq!(archives.len(), 2);
    assert_eq!(archives[0].constraints[0].id, "c2");
    assert!(store.list_archives("s2").is_empty());
}
