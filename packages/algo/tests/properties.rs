//! Property-Based Tests for the matcher and the topic selector
//!
//! Invariants:
//! - Normalization is idempotent and case-insensitive
//! - Scores stay in [0, 100]; identical non-empty inputs are perfect
//! - Category weights are strictly positive for any well-formed history
//! - A recommendation always has the configured length and stays in the universe

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tutor_algo::topics::DEFAULT_CATEGORIES;
use tutor_algo::{
    match_pronunciation, normalize_text, MatchCategory, QuizAttemptRecord, TopicSelector,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_utterance() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?'_-]{0,40}"
}

fn arb_unicode_utterance() -> impl Strategy<Value = String> {
    "\\PC{0,20}"
}

fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        proptest::sample::select(DEFAULT_CATEGORIES.to_vec()).prop_map(|s| s.to_string()),
        Just("mixed".to_string()),
        Just("AI Smart Quiz".to_string()),
        "[a-z]{1,8}",
    ]
}

fn arb_record() -> impl Strategy<Value = QuizAttemptRecord> {
    (arb_category(), 0u32..=10, 0u32..=10).prop_map(|(category, score, total)| {
        QuizAttemptRecord::new(category, score as f64, total as f64)
    })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(raw in arb_utterance()) {
        let once = normalize_text(&raw);
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_any_script(raw in arb_unicode_utterance()) {
        let once = normalize_text(&raw);
        prop_assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn normalize_ignores_case(raw in arb_utterance()) {
        prop_assert_eq!(normalize_text(&raw.to_lowercase()), normalize_text(&raw.to_uppercase()));
    }

    #[test]
    fn score_is_bounded(expected in arb_utterance(), recognized in arb_utterance()) {
        let result = match_pronunciation(&expected, &recognized);
        prop_assert!(result.score >= 0.0 && result.score <= 100.0);
        if result.category == MatchCategory::NoSpeech {
            prop_assert_eq!(result.score, 0.0);
        }
    }

    #[test]
    fn identical_input_is_perfect(word in "[a-zA-Z]{1,12}") {
        let result = match_pronunciation(&word, &word);
        prop_assert_eq!(result.category, MatchCategory::Perfect);
        prop_assert_eq!(result.score, 100.0);
    }

    #[test]
    fn weights_are_strictly_positive(history in proptest::collection::vec(arb_record(), 0..60)) {
        let selector = TopicSelector::default();
        let weights = selector.category_weights(&history).unwrap();
        prop_assert_eq!(weights.len(), DEFAULT_CATEGORIES.len());
        prop_assert!(weights.iter().all(|w| w.weight > 0.0));
    }

    #[test]
    fn recommendation_shape(
        history in proptest::collection::vec(arb_record(), 0..60),
        seed in any::<u64>(),
    ) {
        let selector = TopicSelector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let topics = selector.recommend(&history, &mut rng);
        prop_assert_eq!(topics.len(), 10);
        prop_assert!(topics.iter().all(|t| DEFAULT_CATEGORIES.contains(&t.as_str())));
    }
}
