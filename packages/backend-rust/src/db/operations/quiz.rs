use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tutor_algo::QuizAttemptRecord;
use uuid::Uuid;

use crate::db::{now_iso, ProgressStore, StoreError};

#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub user_id: String,
    pub category: String,
    pub questions: serde_json::Value,
    pub score: f64,
    pub total_questions: f64,
    pub percentage: Option<f64>,
    pub time_elapsed: Option<f64>,
    pub completed_at: Option<String>,
}

/// Stored assessment, as listed in quiz history
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizAttempt {
    pub assessment_id: String,
    pub category: String,
    pub questions: serde_json::Value,
    pub score: f64,
    pub total_questions: f64,
    pub percentage: Option<f64>,
    pub time_elapsed: Option<f64>,
    pub completed_at: String,
    pub timestamp: String,
}

impl QuizAttempt {
    pub fn to_record(&self) -> QuizAttemptRecord {
        QuizAttemptRecord {
            category: self.category.clone(),
            score: self.score,
            total_questions: self.total_questions,
            percentage: self.percentage,
            timestamp: Some(self.timestamp.clone()),
        }
    }
}

fn map_attempt(row: &SqliteRow) -> Result<QuizAttempt, StoreError> {
    let raw_questions: String = row.try_get("questions")?;
    let questions = serde_json::from_str(&raw_questions)
        .map_err(|e| StoreError::Corrupt(format!("quiz questions: {e}")))?;

    Ok(QuizAttempt {
        assessment_id: row.try_get("id")?,
        category: row.try_get("category")?,
        questions,
        score: row.try_get("score")?,
        total_questions: row.try_get("totalQuestions")?,
        percentage: row.try_get("percentage")?,
        time_elapsed: row.try_get("timeElapsed")?,
        completed_at: row.try_get("completedAt")?,
        timestamp: row.try_get("timestamp")?,
    })
}

/// Store an assessment, returning its generated id
pub async fn insert_quiz_attempt(
    store: &ProgressStore,
    attempt: &NewQuizAttempt,
) -> Result<String, StoreError> {
    let id = Uuid::new_v4().to_string();
    let now = now_iso();
    let completed_at = attempt.completed_at.clone().unwrap_or_else(|| now.clone());

    sqlx::query(
        r#"
        INSERT INTO "quiz_attempts" (
            "id", "userId", "category", "questions", "score", "totalQuestions",
            "percentage", "timeElapsed", "completedAt", "timestamp"
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&attempt.user_id)
    .bind(&attempt.category)
    .bind(attempt.questions.to_string())
    .bind(attempt.score)
    .bind(attempt.total_questions)
    .bind(attempt.percentage)
    .bind(attempt.time_elapsed)
    .bind(&completed_at)
    .bind(&now)
    .execute(store.pool())
    .await?;

    Ok(id)
}

/// Full quiz history, oldest first
pub async fn list_quiz_attempts(
    store: &ProgressStore,
    user_id: &str,
) -> Result<Vec<QuizAttempt>, StoreError> {
    let rows = sqlx::query(r#"SELECT * FROM "quiz_attempts" WHERE "userId" = ? ORDER BY "seq""#)
        .bind(user_id)
        .fetch_all(store.pool())
        .await?;
    rows.iter().map(map_attempt).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_attempt(category: &str, score: f64) -> NewQuizAttempt {
        NewQuizAttempt {
            user_id: "u1".into(),
            category: category.into(),
            questions: serde_json::json!([{"question": "2 + 2?", "answer": "4"}]),
            score,
            total_questions: 5.0,
            percentage: Some(score * 20.0),
            time_elapsed: None,
            completed_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let store = ProgressStore::in_memory().await.unwrap();
        let first = insert_quiz_attempt(&store, &new_attempt("abc", 4.0))
            .await
            .unwrap();
        insert_quiz_attempt(&store, &new_attempt("numbers", 2.0))
            .await
            .unwrap();

        let history = list_quiz_attempts(&store, "u1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].assessment_id, first);
        assert_eq!(history[0].questions[0]["answer"], "4");
        assert_eq!(history[1].category, "numbers");
        assert_eq!(history[1].completed_at, history[1].timestamp);
        assert!(list_quiz_attempts(&store, "u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_to_record_keeps_scores() {
        let store = ProgressStore::in_memory().await.unwrap();
        insert_quiz_attempt(&store, &new_attempt("colors", 3.0))
            .await
            .unwrap();
        let record = list_quiz_attempts(&store, "u1").await.unwrap()[0].to_record();
        assert_eq!(record.category, "colors");
        assert_eq!(record.score, 3.0);
        assert_eq!(record.total_questions, 5.0);
        assert_eq!(record.percentage, Some(60.0));
    }
}
