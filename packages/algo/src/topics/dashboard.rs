//! Dashboard prerequisite recommendation
//!
//! Independent from the weighted sampler: it reads which lesson items a child
//! has finished, not quiz scores, and names exactly one next topic.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{DashboardRecommendation, TopicStatus};

/// Completed lesson items per lesson category
pub type CompletedItems = BTreeMap<String, BTreeSet<String>>;

const STEPS: [(&str, &str, TopicStatus); 3] = [
    (
        "abc",
        "⚠️ You missed a step! Please complete ABC lessons first.",
        TopicStatus::Priority,
    ),
    (
        "numbers",
        "Great job on ABCs! ✅ Now let's learn Numbers.",
        TopicStatus::NextStep,
    ),
    (
        "colors",
        "You know ABCs and Numbers! 🌈 Time for Colors!",
        TopicStatus::NextStep,
    ),
];

const OPEN_TOPIC: &str = "shapes";
const OPEN_MESSAGE: &str = "You are doing great! Let's explore Shapes or Fruits.";

/// First unmet step of abc → numbers → colors, otherwise shapes
pub fn dashboard_recommendation(completed: &CompletedItems) -> DashboardRecommendation {
    let has_any = |category: &str| completed.get(category).is_some_and(|items| !items.is_empty());

    for (topic, message, status) in STEPS {
        if !has_any(topic) {
            return DashboardRecommendation {
                topic: topic.to_string(),
                message: message.to_string(),
                status,
            };
        }
    }

    DashboardRecommendation {
        topic: OPEN_TOPIC.to_string(),
        message: OPEN_MESSAGE.to_string(),
        status: TopicStatus::Open,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(pairs: &[(&str, &[&str])]) -> CompletedItems {
        pairs
            .iter()
            .map(|(cat, items)| {
                (
                    cat.to_string(),
                    items.iter().map(|i| i.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_nothing_completed_recommends_abc() {
        let rec = dashboard_recommendation(&CompletedItems::new());
        assert_eq!(rec.topic, "abc");
        assert_eq!(rec.status, TopicStatus::Priority);

        // present but empty sets count as not done
        let rec = dashboard_recommendation(&completed(&[("abc", &[]), ("numbers", &[])]));
        assert_eq!(rec.topic, "abc");
        assert_eq!(rec.status, TopicStatus::Priority);
    }

    #[test]
    fn test_progression_chain() {
        let rec = dashboard_recommendation(&completed(&[("abc", &["A"])]));
        assert_eq!((rec.topic.as_str(), rec.status), ("numbers", TopicStatus::NextStep));

        let rec = dashboard_recommendation(&completed(&[("abc", &["A"]), ("numbers", &["1"])]));
        assert_eq!((rec.topic.as_str(), rec.status), ("colors", TopicStatus::NextStep));

        let rec = dashboard_recommendation(&completed(&[
            ("abc", &["A"]),
            ("numbers", &["1"]),
            ("colors", &["RED"]),
        ]));
        assert_eq!((rec.topic.as_str(), rec.status), ("shapes", TopicStatus::Open));
    }

    #[test]
    fn test_earlier_gap_wins_over_later_progress() {
        let rec = dashboard_recommendation(&completed(&[
            ("numbers", &["1"]),
            ("colors", &["RED"]),
            ("shapes", &["CIRCLE"]),
        ]));
        assert_eq!(rec.topic, "abc");
        assert_eq!(rec.status, TopicStatus::Priority);
    }
}
