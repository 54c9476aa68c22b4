//! Property tests: confidence bounds and determinism over arbitrary requests.

use arbiter_core::config::ArbiterConfig;
use arbiter_core::models::ClassifierSource;
use arbiter_engine::ArbiterEngine;
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "index", "replication", "consistency", "latency", "cache", "lru", "mutex", "tcp", "oauth",
    "durability", "transactions", "contention", "the", "for", "design", "haiku", "raft",
];

fn request_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(WORDS), 0..8).prop_map(|w| w.join(" "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn confidence_is_bounded_and_one_only_from_cache(
        requests in proptest::collection::vec(request_strategy(), 1..12)
    ) {
        let engine = ArbiterEngine::in_memory(ArbiterConfig::default()).unwrap();
        for request in &requests {
            let outcome = engine.classify("p", request);
            let confidence = outcome.result.confidence();
            prop_assert!((0.0..=1.0).contains(&confidence));
            if outcome.result.classifier_source() != ClassifierSource::PatternCache {
                prop_assert!(confidence <= 0.99);
            }
            if outcome.result.systems().len() >= 2
                && outcome.result.classifier_source() != ClassifierSource::PatternCache
            {
                prop_assert!(confidence <= 0.69);
            }
        }
    }

    #[test]
    fn evaluate_twice_is_identical(
        history in proptest::collection::vec(request_strategy(), 0..6),
        request in request_strategy(),
    ) {
        let engine = ArbiterEngine::in_memory(ArbiterConfig::default()).unwrap();
        for earlier in &history {
            engine.classify("p", earlier);
        }
        let first = engine.evaluate("p", &request);
        let second = engine.evaluate("p", &request);
        prop_assert_eq!(first, second);
    }
}
