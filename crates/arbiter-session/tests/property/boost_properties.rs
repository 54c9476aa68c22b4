//! Property tests for the session prior boost.

use arbiter_core::config::SessionConfig;
use arbiter_core::models::{ClassificationResult, ClassifierSource, SessionHistoryEntry};
use arbiter_session::boost::{compute_prior_boost, system_affinity};
use chrono::Utc;
use proptest::prelude::*;

const SYSTEMS: &[&str] = &["storage", "distributed", "concurrency", "caching", "networking"];

fn systems_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::sample::subsequence(SYSTEMS, 0..=SYSTEMS.len())
        .prop_map(|v| v.into_iter().map(String::from).collect())
}

fn entry(systems: Vec<String>) -> SessionHistoryEntry {
    SessionHistoryEntry {
        signature: systems.join(" "),
        result: ClassificationResult::new(systems, vec![], 0.7, ClassifierSource::KeywordFastPath),
        timestamp: Utc::now(),
        prev_signature: None,
    }
}

proptest! {
    #[test]
    fn boost_never_exceeds_cap(
        current in systems_strategy(),
        history in proptest::collection::vec(systems_strategy(), 0..20),
        binary in 0usize..5,
    ) {
        let recent: Vec<_> = history.into_iter().map(entry).collect();
        let boost = compute_prior_boost(&current, binary, &recent, &SessionConfig::default());
        prop_assert!((0.0..=0.10).contains(&boost));
        if binary == 0 {
            prop_assert_eq!(boost, 0.0);
        }
    }

    #[test]
    fn affinity_is_a_share(
        system in proptest::sample::select(SYSTEMS),
        history in proptest::collection::vec(systems_strategy(), 0..20),
    ) {
        let recent: Vec<_> = history.into_iter().map(entry).collect();
        let a = system_affinity(system, &recent, &SessionConfig::default());
        prop_assert!((0.0..=1.0).contains(&a));
    }
}
