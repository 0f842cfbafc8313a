//! Dashboard aggregates over speech and quiz history

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tutor_algo::sanitize::round2;
use tutor_algo::{dashboard_recommendation, CompletedItems, DashboardRecommendation};

use crate::db::operations::{QuizAttempt, SpeechAttempt};

pub const RECENT_SPEECH_ATTEMPTS: usize = 5;
pub const RECENT_QUIZZES: usize = 20;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LessonSpeechStats {
    pub attempts: u32,
    pub avg_accuracy: f64,
    pub words_count: usize,
    pub best_accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeechAnalytics {
    pub total_attempts: usize,
    pub average_accuracy: f64,
    pub total_points_earned: i64,
    pub lesson_statistics: BTreeMap<String, LessonSpeechStats>,
    pub recent_attempts: Vec<SpeechAttempt>,
    pub speech_history: Vec<SpeechAttempt>,
}

/// `None` for a learner who never spoke
pub fn speech_analytics(history: Vec<SpeechAttempt>) -> Option<SpeechAnalytics> {
    if history.is_empty() {
        return None;
    }

    #[derive(Default)]
    struct Acc<'a> {
        attempts: u32,
        total_accuracy: f64,
        best_accuracy: f64,
        words: BTreeSet<&'a str>,
    }

    let mut per_lesson: BTreeMap<&str, Acc> = BTreeMap::new();
    for attempt in &history {
        let acc = per_lesson.entry(attempt.lesson_type.as_str()).or_default();
        acc.attempts += 1;
        acc.total_accuracy += attempt.accuracy;
        acc.best_accuracy = acc.best_accuracy.max(attempt.accuracy);
        acc.words.insert(attempt.expected.as_str());
    }

    let lesson_statistics = per_lesson
        .into_iter()
        .map(|(lesson, acc)| {
            (
                lesson.to_string(),
                LessonSpeechStats {
                    attempts: acc.attempts,
                    avg_accuracy: round2(acc.total_accuracy / acc.attempts as f64),
                    words_count: acc.words.len(),
                    best_accuracy: acc.best_accuracy,
                },
            )
        })
        .collect();

    let total_attempts = history.len();
    let average_accuracy = round2(
        history.iter().map(|a| a.accuracy).sum::<f64>() / total_attempts as f64,
    );
    let total_points_earned = history.iter().map(|a| a.points).sum();
    let recent_attempts = history[total_attempts.saturating_sub(RECENT_SPEECH_ATTEMPTS)..].to_vec();

    Some(SpeechAnalytics {
        total_attempts,
        average_accuracy,
        total_points_earned,
        lesson_statistics,
        recent_attempts,
        speech_history: history,
    })
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CategoryQuizStats {
    pub attempts: u32,
    pub total_score: f64,
    pub total_percentage: f64,
    pub avg_score: f64,
    pub avg_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizAnalytics {
    pub total_quizzes: usize,
    pub average_percentage: f64,
    pub quiz_history: Vec<QuizAttempt>,
    pub category_statistics: BTreeMap<String, CategoryQuizStats>,
    pub dashboard_recommendation: DashboardRecommendation,
}

/// Per-category totals over `categories`, with history outside them only
/// counted in the overall figures
pub fn quiz_analytics(
    history: Vec<QuizAttempt>,
    categories: &[String],
    completed: &CompletedItems,
) -> QuizAnalytics {
    let mut category_statistics: BTreeMap<String, CategoryQuizStats> = categories
        .iter()
        .map(|c| (c.clone(), CategoryQuizStats::default()))
        .collect();

    for quiz in &history {
        if let Some(stats) = category_statistics.get_mut(&quiz.category.to_lowercase()) {
            stats.attempts += 1;
            stats.total_score += quiz.score;
            stats.total_percentage += quiz.percentage.unwrap_or(0.0);
        }
    }
    for stats in category_statistics.values_mut() {
        if stats.attempts > 0 {
            stats.avg_score = round2(stats.total_score / stats.attempts as f64);
            stats.avg_percentage = round2(stats.total_percentage / stats.attempts as f64);
        }
    }

    let total_quizzes = history.len();
    let average_percentage = if total_quizzes == 0 {
        0.0
    } else {
        round2(
            history
                .iter()
                .map(|q| q.percentage.unwrap_or(0.0))
                .sum::<f64>()
                / total_quizzes as f64,
        )
    };

    let mut quiz_history = history;
    let keep_from = quiz_history.len().saturating_sub(RECENT_QUIZZES);
    quiz_history.drain(..keep_from);

    QuizAnalytics {
        total_quizzes,
        average_percentage,
        quiz_history,
        category_statistics,
        dashboard_recommendation: dashboard_recommendation(completed),
    }
}
