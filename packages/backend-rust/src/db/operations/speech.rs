use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::{ProgressStore, StoreError};

/// One entry of a learner's speech history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechAttempt {
    pub lesson_type: String,
    pub expected: String,
    pub recognized: String,
    pub accuracy: f64,
    pub match_type: String,
    pub points: i64,
    pub timestamp: String,
}

fn map_attempt(row: &SqliteRow) -> Result<SpeechAttempt, sqlx::Error> {
    Ok(SpeechAttempt {
        lesson_type: row.try_get("lessonType")?,
        expected: row.try_get("expected")?,
        recognized: row.try_get("recognized")?,
        accuracy: row.try_get("accuracy")?,
        match_type: row.try_get("matchType")?,
        points: row.try_get("points")?,
        timestamp: row.try_get("timestamp")?,
    })
}

/// Append an attempt and credit its points. Creates the progress row when
/// the learner has none yet.
pub async fn record_speech_attempt(
    store: &ProgressStore,
    user_id: &str,
    attempt: &SpeechAttempt,
) -> Result<(), StoreError> {
    let mut tx = store.pool().begin().await?;

    sqlx::query(
        r#"
        INSERT INTO "speech_history" (
            "userId", "lessonType", "expected", "recognized", "accuracy", "matchType", "points", "timestamp"
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&attempt.lesson_type)
    .bind(&attempt.expected)
    .bind(&attempt.recognized)
    .bind(attempt.accuracy)
    .bind(&attempt.match_type)
    .bind(attempt.points)
    .bind(&attempt.timestamp)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO "progress" ("userId", "childName", "totalScore", "lastActivity")
        VALUES (?, '', ?, ?)
        ON CONFLICT ("userId") DO UPDATE SET
            "totalScore" = "progress"."totalScore" + excluded."totalScore",
            "lastActivity" = excluded."lastActivity"
        "#,
    )
    .bind(user_id)
    .bind(attempt.points)
    .bind(&attempt.timestamp)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Full history, oldest first
pub async fn list_speech_attempts(
    store: &ProgressStore,
    user_id: &str,
) -> Result<Vec<SpeechAttempt>, StoreError> {
    let rows = sqlx::query(r#"SELECT * FROM "speech_history" WHERE "userId" = ? ORDER BY "id""#)
        .bind(user_id)
        .fetch_all(store.pool())
        .await?;
    Ok(rows.iter().map(map_attempt).collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::operations::progress::{create_progress, get_progress_summary};

    fn attempt(expected: &str, accuracy: f64, points: i64) -> SpeechAttempt {
        SpeechAttempt {
            lesson_type: "colors".into(),
            expected: expected.into(),
            recognized: expected.into(),
            accuracy,
            match_type: "perfect".into(),
            points,
            timestamp: crate::db::now_iso(),
        }
    }

    #[tokio::test]
    async fn test_attempts_accumulate_points() {
        let store = ProgressStore::in_memory().await.unwrap();
        create_progress(&store, "u1", "Kim Lo").await.unwrap();

        record_speech_attempt(&store, "u1", &attempt("RED", 100.0, 5))
            .await
            .unwrap();
        record_speech_attempt(&store, "u1", &attempt("BLUE", 60.0, 3))
            .await
            .unwrap();

        let history = list_speech_attempts(&store, "u1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].expected, "RED");
        assert_eq!(history[1].points, 3);

        let summary = get_progress_summary(&store, "u1").await.unwrap().unwrap();
        assert_eq!(summary.total_score, 8);
        assert_eq!(summary.child_name, "Kim Lo");
        assert!(summary.last_activity.is_some());
    }

    #[tokio::test]
    async fn test_attempt_creates_missing_progress_row() {
        let store = ProgressStore::in_memory().await.unwrap();
        record_speech_attempt(&store, "u2", &attempt("STAR", 95.0, 5))
            .await
            .unwrap();
        let summary = get_progress_summary(&store, "u2").await.unwrap().unwrap();
        assert_eq!(summary.total_score, 5);
    }
}
