//! Pronunciation Matcher
//!
//! Scores a recognized transcript against the expected word or phrase with a
//! policy tuned for 3-5 year olds. Rules are tried in order and the first one
//! that fires decides the result:
//!
//! 1. exact match
//! 2. listed toddler variant (exact, not substring)
//! 3. target contained in a longer utterance
//! 4. R→W, TH→F, L→W substitution of the target
//! 5. fuzzy similarity against the target and its variants

pub mod variants;

use crate::sanitize::{normalize_text, round2};
use crate::similarity::ratio;
use crate::types::{
    MatchCategory, MatchResult, RewardTier, SCORE_PERFECT, SCORE_SENTENCE_MATCH,
    SCORE_SPEECH_IMPEDIMENT_MATCH, SCORE_TODDLER_MATCH,
};

pub use variants::{toddler_variants, variants_for};

/// Letter swaps, applied in this order
const SUBSTITUTIONS: [(&str, &str); 3] = [("R", "W"), ("TH", "F"), ("L", "W")];

/// Score a spoken attempt. Both inputs are normalized first.
pub fn match_pronunciation(expected: &str, recognized: &str) -> MatchResult {
    let expected = normalize_text(expected);
    let recognized = normalize_text(recognized);

    if expected.is_empty() || recognized.is_empty() {
        return MatchResult::no_speech();
    }

    let variants = variants_for(&expected);

    if expected == recognized {
        return MatchResult::new(SCORE_PERFECT, MatchCategory::Perfect);
    }

    if variants.is_some_and(|vs| vs.iter().any(|v| *v == recognized)) {
        return MatchResult::new(SCORE_TODDLER_MATCH, MatchCategory::ToddlerMatch);
    }

    if recognized.contains(expected.as_str()) {
        return MatchResult::new(SCORE_SENTENCE_MATCH, MatchCategory::SentenceMatch);
    }

    if toddler_substitution(&expected) == recognized {
        return MatchResult::new(
            SCORE_SPEECH_IMPEDIMENT_MATCH,
            MatchCategory::SpeechImpedimentMatch,
        );
    }

    let similarity = best_similarity(&expected, &recognized, variants.unwrap_or(&[]));
    MatchResult::new(round2(similarity), MatchCategory::from_similarity(similarity))
}

/// Apply the fixed substitution chain to a normalized target
pub fn toddler_substitution(expected: &str) -> String {
    SUBSTITUTIONS
        .iter()
        .fold(expected.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Highest similarity (0-100, un-rounded) of the transcript to the target or
/// any of its variants
pub fn best_similarity(expected: &str, recognized: &str, variants: &[&str]) -> f64 {
    variants
        .iter()
        .map(|variant| ratio(variant, recognized) * 100.0)
        .fold(ratio(expected, recognized) * 100.0, f64::max)
}

/// Reward bucket for a match, see [`RewardTier::from_score`]
pub fn reward_for(result: &MatchResult) -> RewardTier {
    RewardTier::from_score(result.score)
}
