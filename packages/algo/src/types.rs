//! Common Types and Constants
//!
//! Shared data structures used across the matcher and the topic selector.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Score for an exact match
pub const SCORE_PERFECT: f64 = 100.0;

/// Score for an accepted toddler pronunciation
pub const SCORE_TODDLER_MATCH: f64 = 98.0;

/// Score when the target word appears inside a longer utterance
pub const SCORE_SENTENCE_MATCH: f64 = 95.0;

/// Score for a letter-substitution (R/TH/L) match
pub const SCORE_SPEECH_IMPEDIMENT_MATCH: f64 = 92.0;

/// High similarity lower bound (0-100 scale, inclusive)
pub const HIGH_SIMILARITY_THRESHOLD: f64 = 75.0;

/// Medium similarity lower bound (0-100 scale, inclusive)
pub const MEDIUM_SIMILARITY_THRESHOLD: f64 = 50.0;

/// Number of topics drawn per recommendation
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Default assumed question count for records that omit it
pub const DEFAULT_TOTAL_QUESTIONS: f64 = 5.0;

// ==================== Pronunciation Types ====================

/// Which rule of the matching cascade produced a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    NoSpeech,
    Perfect,
    ToddlerMatch,
    SentenceMatch,
    SpeechImpedimentMatch,
    HighSimilarity,
    MediumSimilarity,
    LowSimilarity,
}

impl MatchCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::NoSpeech => "no_speech",
            MatchCategory::Perfect => "perfect",
            MatchCategory::ToddlerMatch => "toddler_match",
            MatchCategory::SentenceMatch => "sentence_match",
            MatchCategory::SpeechImpedimentMatch => "speech_impediment_match",
            MatchCategory::HighSimilarity => "high_similarity",
            MatchCategory::MediumSimilarity => "medium_similarity",
            MatchCategory::LowSimilarity => "low_similarity",
        }
    }

    /// Band for a fuzzy similarity on the 0-100 scale.
    ///
    /// Callers must pass the un-rounded value: 74.996 is medium even though it
    /// displays as 75.00.
    pub fn from_similarity(similarity: f64) -> Self {
        if similarity >= HIGH_SIMILARITY_THRESHOLD {
            MatchCategory::HighSimilarity
        } else if similarity >= MEDIUM_SIMILARITY_THRESHOLD {
            MatchCategory::MediumSimilarity
        } else {
            MatchCategory::LowSimilarity
        }
    }
}

impl std::fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pronunciation check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0-100, at most two fractional digits
    pub score: f64,
    pub category: MatchCategory,
}

impl MatchResult {
    pub fn new(score: f64, category: MatchCategory) -> Self {
        Self { score, category }
    }

    pub fn no_speech() -> Self {
        Self::new(0.0, MatchCategory::NoSpeech)
    }
}

/// Coarse reward bucket derived from a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    Excellent,
    Great,
    Good,
    TryAgain,
}

impl RewardTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            RewardTier::Excellent
        } else if score >= 70.0 {
            RewardTier::Great
        } else if score >= 50.0 {
            RewardTier::Good
        } else {
            RewardTier::TryAgain
        }
    }

    pub fn points(&self) -> i64 {
        match self {
            RewardTier::Excellent => 5,
            RewardTier::Great => 4,
            RewardTier::Good => 3,
            RewardTier::TryAgain => 0,
        }
    }

    pub fn stars(&self) -> u8 {
        match self {
            RewardTier::Excellent => 3,
            RewardTier::Great => 2,
            RewardTier::Good => 1,
            RewardTier::TryAgain => 0,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RewardTier::Excellent => "🏆 Excellent! Perfect pronunciation!",
            RewardTier::Great => "🎉 Great job! You said it well!",
            RewardTier::Good => "🙂 Good try! You're getting closer!",
            RewardTier::TryAgain => "🔁 Let's try again! Listen carefully!",
        }
    }
}

// ==================== Topic Selection Types ====================

/// One completed quiz, as read from a learner's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttemptRecord {
    pub category: String,
    pub score: f64,
    #[serde(default = "default_total_questions")]
    pub total_questions: f64,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

fn default_total_questions() -> f64 {
    DEFAULT_TOTAL_QUESTIONS
}

impl QuizAttemptRecord {
    pub fn new(category: impl Into<String>, score: f64, total_questions: f64) -> Self {
        Self {
            category: category.into(),
            score,
            total_questions,
            percentage: None,
            timestamp: None,
        }
    }
}

/// Per-category statistics and selection weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub category: String,
    pub attempts: u32,
    pub accuracy: f64,
    pub weight: f64,
}

/// State attached to a dashboard recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicStatus {
    Priority,
    NextStep,
    Open,
}

/// Single next-topic suggestion shown on the child dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRecommendation {
    pub topic: String,
    pub message: String,
    pub status: TopicStatus,
}
