//! Adaptive Topic Selector
//!
//! "Basics first": core topics (alphabet, numbers) dominate the draw until
//! they are attempted and passed, then the remaining topics are weighted by
//! how weak the learner is in them. Topics are drawn with replacement, so a
//! weak area can show up several times in one quiz.

pub mod dashboard;

use std::collections::HashMap;

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sanitize::is_invalid;
use crate::types::{CategoryWeight, QuizAttemptRecord, DEFAULT_SAMPLE_SIZE};

pub use dashboard::{dashboard_recommendation, CompletedItems};

/// Core topic, never attempted
pub const WEIGHT_CORE_UNSEEN: f64 = 50.0;
/// Core topic below the pass mark
pub const WEIGHT_CORE_REMEDIATE: f64 = 25.0;
/// Core topic passed
pub const WEIGHT_CORE_MASTERED: f64 = 0.5;
/// Other topic, never attempted
pub const WEIGHT_UNSEEN: f64 = 5.0;
/// Other topic below the pass mark
pub const WEIGHT_WEAK: f64 = 4.0;
/// Other topic passed
pub const WEIGHT_PASSED: f64 = 1.0;

/// Pass mark for core topics
pub const CORE_PASS_ACCURACY: f64 = 0.7;
/// Pass mark for other topics
pub const PASS_ACCURACY: f64 = 0.5;

pub const DEFAULT_CATEGORIES: [&str; 9] = [
    "abc", "numbers", "colors", "shapes", "fruits", "veg", "animals", "body", "days",
];
pub const DEFAULT_CORE_TOPICS: [&str; 2] = ["abc", "numbers"];
pub const DEFAULT_MIXED_SENTINELS: [&str; 3] = ["ai smart quiz", "mixed quiz", "mixed"];

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("category universe is empty")]
    EmptyUniverse,
    #[error("malformed quiz record for {category}: score={score}, total_questions={total_questions}")]
    MalformedRecord {
        category: String,
        score: f64,
        total_questions: f64,
    },
    #[error("invalid category weights: {0}")]
    InvalidWeights(String),
}

/// Which topics exist and how a recommendation is drawn.
///
/// Identifiers are compared against lowercased history categories, so they
/// should be lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumConfig {
    pub categories: Vec<String>,
    pub core_topics: Vec<String>,
    pub mixed_sentinels: Vec<String>,
    pub sample_size: usize,
}

impl Default for CurriculumConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            core_topics: DEFAULT_CORE_TOPICS.iter().map(|s| s.to_string()).collect(),
            mixed_sentinels: DEFAULT_MIXED_SENTINELS.iter().map(|s| s.to_string()).collect(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl CurriculumConfig {
    pub fn is_core(&self, category: &str) -> bool {
        self.core_topics.iter().any(|c| c == category)
    }

    pub fn is_mixed(&self, category: &str) -> bool {
        self.mixed_sentinels.iter().any(|c| c == category)
    }
}

/// Weight for one category given its history
pub fn weight_for(is_core: bool, attempts: u32, accuracy: f64) -> f64 {
    match (is_core, attempts) {
        (true, 0) => WEIGHT_CORE_UNSEEN,
        (true, _) if accuracy < CORE_PASS_ACCURACY => WEIGHT_CORE_REMEDIATE,
        (true, _) => WEIGHT_CORE_MASTERED,
        (false, 0) => WEIGHT_UNSEEN,
        (false, _) if accuracy < PASS_ACCURACY => WEIGHT_WEAK,
        (false, _) => WEIGHT_PASSED,
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    attempts: u32,
    score_sum: f64,
    total_possible: f64,
}

impl Tally {
    fn accuracy(&self) -> f64 {
        if self.attempts == 0 || self.total_possible <= 0.0 {
            0.0
        } else {
            self.score_sum / self.total_possible
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TopicSelector {
    config: CurriculumConfig,
}

impl TopicSelector {
    pub fn new(config: CurriculumConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CurriculumConfig {
        &self.config
    }

    /// Per-category attempts, accuracy and weight, in universe order.
    ///
    /// Mixed-quiz records and categories outside the universe are skipped.
    pub fn category_weights(
        &self,
        history: &[QuizAttemptRecord],
    ) -> Result<Vec<CategoryWeight>, SelectionError> {
        if self.config.categories.is_empty() {
            return Err(SelectionError::EmptyUniverse);
        }

        let index: HashMap<&str, usize> = self
            .config
            .categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();
        let mut tallies = vec![Tally::default(); self.config.categories.len()];

        for record in history {
            let category = record.category.to_lowercase();
            if self.config.is_mixed(&category) {
                continue;
            }
            let Some(&slot) = index.get(category.as_str()) else {
                continue;
            };
            if is_invalid(record.score)
                || is_invalid(record.total_questions)
                || record.score < 0.0
                || record.total_questions < 0.0
            {
                return Err(SelectionError::MalformedRecord {
                    category,
                    score: record.score,
                    total_questions: record.total_questions,
                });
            }
            let tally = &mut tallies[slot];
            tally.attempts += 1;
            tally.score_sum += record.score;
            tally.total_possible += record.total_questions;
        }

        Ok(self
            .config
            .categories
            .iter()
            .zip(tallies)
            .map(|(category, tally)| {
                let accuracy = tally.accuracy();
                CategoryWeight {
                    category: category.clone(),
                    attempts: tally.attempts,
                    accuracy,
                    weight: weight_for(self.config.is_core(category), tally.attempts, accuracy),
                }
            })
            .collect())
    }

    /// Draw `sample_size` topics, weighted by [`Self::category_weights`]
    pub fn select_topics<R: Rng + ?Sized>(
        &self,
        history: &[QuizAttemptRecord],
        rng: &mut R,
    ) -> Result<Vec<String>, SelectionError> {
        let weights = self.category_weights(history)?;
        sample_weighted(&weights, self.config.sample_size, rng)
    }

    /// Like [`Self::select_topics`], degrading to [`Self::fallback_topics`]
    pub fn recommend<R: Rng + ?Sized>(
        &self,
        history: &[QuizAttemptRecord],
        rng: &mut R,
    ) -> Vec<String> {
        self.select_topics(history, rng)
            .unwrap_or_else(|_| self.fallback_topics())
    }

    /// Core topics cycled to the sample size (`[abc, numbers] x 5` by default)
    pub fn fallback_topics(&self) -> Vec<String> {
        let core: Vec<String> = if self.config.core_topics.is_empty() {
            DEFAULT_CORE_TOPICS.iter().map(|s| s.to_string()).collect()
        } else {
            self.config.core_topics.clone()
        };
        core.iter()
            .cycle()
            .take(self.config.sample_size)
            .cloned()
            .collect()
    }
}

/// Sample `n` categories with replacement from a categorical distribution
pub fn sample_weighted<R: Rng + ?Sized>(
    weights: &[CategoryWeight],
    n: usize,
    rng: &mut R,
) -> Result<Vec<String>, SelectionError> {
    let dist = WeightedIndex::new(weights.iter().map(|w| w.weight))
        .map_err(|e| SelectionError::InvalidWeights(e.to_string()))?;
    Ok((0..n)
        .map(|_| weights[dist.sample(rng)].category.clone())
        .collect())
}
