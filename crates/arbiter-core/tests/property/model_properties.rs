use arbiter_core::models::{
    ClassificationPattern, ClassificationResult, ClassifierSource, ConflictType, Priority,
};
use proptest::prelude::*;

fn arb_source() -> impl Strategy<Value = ClassifierSource> {
    prop_oneof![
        Just(ClassifierSource::PatternCache),
        Just(ClassifierSource::KeywordFastPath),
        Just(ClassifierSource::KeywordWeighted),
        Just(ClassifierSource::KeywordWeightedContext),
    ]
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Hard), Just(Priority::Soft)]
}

// ── Pattern consistency over system-set sizes 0–4 ─────────────────────────

proptest! {
    #[test]
    fn pattern_matches_system_count(
        count in 0usize..=4,
        confidence in -1.0f64..2.0,
        source in arb_source(),
    ) {
        let systems: Vec<String> = (0..count).map(|i| format!("system-{i}")).collect();
        let result = ClassificationResult::new(systems, vec![], confidence, source);
        let expected = match count {
            0 => ClassificationPattern::None,
            1 => ClassificationPattern::Single,
            2 => ClassificationPattern::Multi,
            _ => ClassificationPattern::Cross,
        };
        prop_assert_eq!(result.pattern(), expected);
        prop_assert!((0.0..=1.0).contains(&result.confidence()));
    }

    #[test]
    fn pattern_survives_json_round_trip(count in 0usize..=4) {
        let systems: Vec<String> = (0..count).map(|i| format!("s{i}")).collect();
        let result = ClassificationResult::new(systems, vec![], 0.6, ClassifierSource::KeywordWeighted);
        let json = serde_json::to_string(&result).unwrap();
        let back: ClassificationResult = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.pattern(), result.pattern());
        prop_assert_eq!(back.systems(), result.systems());
    }

    #[test]
    fn conflict_type_order_independent(a in arb_priority(), b in arb_priority()) {
        prop_assert_eq!(ConflictType::from_priorities(a, b), ConflictType::from_priorities(b, a));
    }
}
