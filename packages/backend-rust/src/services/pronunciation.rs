//! Turns a transcript into a scored, rewarded speech attempt

use tutor_algo::{match_pronunciation, reward_for, MatchCategory, MatchResult, RewardTier};

use crate::db::operations::SpeechAttempt;

/// Clips below this size carry no usable speech
pub const MIN_AUDIO_BYTES: usize = 800;
pub const DEFAULT_LESSON_TYPE: &str = "colors";

/// Accuracy at which the reward speech skips the model answer
const REPEAT_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAnalysis {
    pub result: MatchResult,
    pub tier: RewardTier,
    pub tts_text: String,
}

impl SpeechAnalysis {
    pub fn points(&self) -> i64 {
        self.tier.points()
    }

    pub fn stars(&self) -> u8 {
        self.tier.stars()
    }

    pub fn reward(&self) -> &'static str {
        self.tier.message()
    }

    pub fn to_attempt(
        &self,
        lesson_type: &str,
        expected: &str,
        recognized: &str,
        timestamp: String,
    ) -> SpeechAttempt {
        SpeechAttempt {
            lesson_type: lesson_type.to_string(),
            expected: expected.to_string(),
            recognized: recognized.to_string(),
            accuracy: self.result.score,
            match_type: self.result.category.as_str().to_string(),
            points: self.points(),
            timestamp,
        }
    }
}

/// Score `recognized` against `expected`. `None` when there is nothing to score.
pub fn analyze(expected: &str, recognized: &str) -> Option<SpeechAnalysis> {
    let result = match_pronunciation(expected, recognized);
    if result.category == MatchCategory::NoSpeech {
        return None;
    }
    let tier = reward_for(&result);
    Some(SpeechAnalysis {
        result,
        tier,
        tts_text: reward_speech(tier, result.score, expected),
    })
}

/// What the tutor says back: praise alone for a near-perfect attempt,
/// otherwise praise plus the word to repeat
pub fn reward_speech(tier: RewardTier, accuracy: f64, expected: &str) -> String {
    let reward = tier.message();
    if accuracy >= REPEAT_THRESHOLD {
        reward.to_string()
    } else {
        format!("{reward} Listen: {expected}. Now you try!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toddler_attempt_is_excellent() {
        let analysis = analyze("Red", "wed").unwrap();
        assert_eq!(analysis.result.score, 98.0);
        assert_eq!(analysis.tier, RewardTier::Excellent);
        assert_eq!(analysis.points(), 5);
        assert_eq!(analysis.stars(), 3);
        assert_eq!(analysis.tts_text, "🏆 Excellent! Perfect pronunciation!");
    }

    #[test]
    fn test_weak_attempt_repeats_the_word() {
        let analysis = analyze("DOG", "DOT").unwrap();
        assert_eq!(analysis.tier, RewardTier::Good);
        assert_eq!(
            analysis.tts_text,
            "🙂 Good try! You're getting closer! Listen: DOG. Now you try!"
        );
    }

    #[test]
    fn test_silence_is_not_scored() {
        assert!(analyze("RED", "").is_none());
        assert!(analyze("RED", " ?! ").is_none());
    }

    #[test]
    fn test_to_attempt_carries_raw_text() {
        let analysis = analyze("Rabbit", "wabbit").unwrap();
        let attempt = analysis.to_attempt("animals", "Rabbit", "wabbit", "t".into());
        assert_eq!(attempt.expected, "Rabbit");
        assert_eq!(attempt.recognized, "wabbit");
        assert_eq!(attempt.match_type, "speech_impediment_match");
        assert_eq!(attempt.accuracy, 92.0);
        assert_eq!(attempt.points, 5);
    }
}
