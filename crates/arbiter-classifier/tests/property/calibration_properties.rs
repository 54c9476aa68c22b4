//! Property tests for confidence calibration and classification bounds.

use arbiter_classifier::{calibrate, CalibrationInput, Classifier};
use arbiter_core::config::CalibrationConfig;
use arbiter_core::constants::MAX_LIVE_CONFIDENCE;
use arbiter_core::models::ClassificationPattern;
use arbiter_core::traits::NoContext;
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "index", "replication", "cache", "mutex", "tcp", "oauth", "latency", "contention",
    "transactions", "durability", "consistency", "design", "the", "service", "haiku",
];

proptest! {
    #[test]
    fn calibrated_confidence_stays_live(
        total in 0usize..5,
        count in 0usize..5,
        has_subdomain in any::<bool>(),
        active in any::<bool>(),
        gap in -10.0f64..10.0,
        dominance in -1.0f64..2.0,
    ) {
        let input = CalibrationInput {
            total_binary_matches: total,
            final_system_count: count,
            has_subdomain,
            phase2_active: active,
            gap,
            dominance,
        };
        let c = calibrate(&input, &CalibrationConfig::default());
        prop_assert!((0.0..=MAX_LIVE_CONFIDENCE).contains(&c));
    }

    #[test]
    fn multi_system_weighted_confidence_below_single_threshold(
        count in 2usize..6,
        gap in 0.0f64..10.0,
    ) {
        let input = CalibrationInput {
            total_binary_matches: 0,
            final_system_count: count,
            has_subdomain: false,
            phase2_active: true,
            gap,
            dominance: 0.5,
        };
        prop_assert!(calibrate(&input, &CalibrationConfig::default()) <= 0.69);
    }

    #[test]
    fn classification_bounds_hold_for_word_soup(
        picks in proptest::collection::vec(0usize..WORDS.len(), 0..8),
    ) {
        let request: Vec<&str> = picks.iter().map(|&i| WORDS[i]).collect();
        let request = request.join(" ");
        let classifier = Classifier::with_defaults().unwrap();
        let result = classifier.classify(&request, &NoContext).result;

        prop_assert!(result.confidence() >= 0.0);
        prop_assert!(result.confidence() <= MAX_LIVE_CONFIDENCE);
        prop_assert_eq!(result.pattern(), ClassificationPattern::from_count(result.systems().len()));
        if result.systems().len() >= 2 {
            prop_assert!(result.confidence() <= 0.69);
        }
    }
}
