use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tutor_algo::CompletedItems;

use crate::db::operations::user::USER_TYPE_CHILD;
use crate::db::{now_iso, ProgressStore, StoreError};

/// Lesson categories that track completed items
pub const LESSON_CATEGORIES: [&str; 6] = ["abc", "numbers", "shapes", "colors", "poems", "fruits"];

pub fn is_lesson_category(category: &str) -> bool {
    LESSON_CATEGORIES.contains(&category)
}

/// Progress document as the dashboards read it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressSummary {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub child_name: String,
    pub completed_items: BTreeMap<String, Vec<String>>,
    pub total_score: i64,
    pub last_activity: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Added,
    AlreadyCompleted,
    MissingProfile,
}

fn empty_completed_items() -> BTreeMap<String, Vec<String>> {
    LESSON_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), Vec::new()))
        .collect()
}

fn map_summary(row: &SqliteRow) -> Result<ProgressSummary, sqlx::Error> {
    Ok(ProgressSummary {
        user_id: row.try_get("userId")?,
        child_name: row.try_get("childName")?,
        completed_items: empty_completed_items(),
        total_score: row.try_get("totalScore")?,
        last_activity: row.try_get("lastActivity")?,
    })
}

/// Create an empty progress row, no-op when one exists
pub async fn create_progress(
    store: &ProgressStore,
    user_id: &str,
    child_name: &str,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"INSERT OR IGNORE INTO "progress" ("userId", "childName", "totalScore") VALUES (?, ?, 0)"#,
    )
    .bind(user_id)
    .bind(child_name)
    .execute(store.pool())
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Give every child account without a progress row an empty one
pub async fn backfill_child_progress(store: &ProgressStore) -> Result<u64, StoreError> {
    let result = sqlx::query(
        r#"
        INSERT INTO "progress" ("userId", "childName", "totalScore")
        SELECT u."id", trim(u."firstName" || ' ' || u."lastName"), 0
        FROM "users" u
        WHERE u."userType" = ?
          AND NOT EXISTS (SELECT 1 FROM "progress" p WHERE p."userId" = u."id")
        "#,
    )
    .bind(USER_TYPE_CHILD)
    .execute(store.pool())
    .await?;
    Ok(result.rows_affected())
}

async fn completed_rows(
    store: &ProgressStore,
    user_id: Option<&str>,
) -> Result<Vec<(String, String, String)>, StoreError> {
    let rows = match user_id {
        Some(id) => {
            sqlx::query(
                r#"SELECT "userId", "category", "item" FROM "completed_items" WHERE "userId" = ? ORDER BY rowid"#,
            )
            .bind(id)
            .fetch_all(store.pool())
            .await?
        }
        None => {
            sqlx::query(r#"SELECT "userId", "category", "item" FROM "completed_items" ORDER BY rowid"#)
                .fetch_all(store.pool())
                .await?
        }
    };

    rows.iter()
        .map(|row| -> Result<(String, String, String), sqlx::Error> {
            Ok((
                row.try_get("userId")?,
                row.try_get("category")?,
                row.try_get("item")?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::from)
}

pub async fn get_progress_summary(
    store: &ProgressStore,
    user_id: &str,
) -> Result<Option<ProgressSummary>, StoreError> {
    let row = sqlx::query(r#"SELECT * FROM "progress" WHERE "userId" = ? LIMIT 1"#)
        .bind(user_id)
        .fetch_optional(store.pool())
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let mut summary = map_summary(&row)?;
    for (_, category, item) in completed_rows(store, Some(user_id)).await? {
        summary.completed_items.entry(category).or_default().push(item);
    }
    Ok(Some(summary))
}

pub async fn list_progress_summaries(
    store: &ProgressStore,
) -> Result<Vec<ProgressSummary>, StoreError> {
    let rows = sqlx::query(r#"SELECT * FROM "progress" ORDER BY rowid"#)
        .fetch_all(store.pool())
        .await?;
    let mut summaries = rows
        .iter()
        .map(map_summary)
        .collect::<Result<Vec<_>, _>>()?;

    let index: BTreeMap<String, usize> = summaries
        .iter()
        .enumerate()
        .map(|(i, s)| (s.user_id.clone(), i))
        .collect();
    for (user_id, category, item) in completed_rows(store, None).await? {
        if let Some(&i) = index.get(&user_id) {
            summaries[i]
                .completed_items
                .entry(category)
                .or_default()
                .push(item);
        }
    }
    Ok(summaries)
}

/// Completed item sets for the dashboard recommendation
pub async fn completed_items(
    store: &ProgressStore,
    user_id: &str,
) -> Result<CompletedItems, StoreError> {
    let mut items = CompletedItems::new();
    for (_, category, item) in completed_rows(store, Some(user_id)).await? {
        items.entry(category).or_default().insert(item);
    }
    Ok(items)
}

/// Add `item` to a lesson category. A new item is worth one point, a repeat
/// only refreshes the activity time.
pub async fn mark_item_complete(
    store: &ProgressStore,
    user_id: &str,
    category: &str,
    item: &str,
) -> Result<MarkOutcome, StoreError> {
    let now = now_iso();
    let mut tx = store.pool().begin().await?;

    let exists: Option<i64> =
        sqlx::query_scalar(r#"SELECT 1 FROM "progress" WHERE "userId" = ? LIMIT 1"#)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_none() {
        return Ok(MarkOutcome::MissingProfile);
    }

    let inserted = sqlx::query(
        r#"INSERT OR IGNORE INTO "completed_items" ("userId", "category", "item", "completedAt") VALUES (?, ?, ?, ?)"#,
    )
    .bind(user_id)
    .bind(category)
    .bind(item)
    .bind(&now)
    .execute(&mut *tx)
    .await?
    .rows_affected()
        > 0;

    let (sql, outcome) = if inserted {
        (
            r#"UPDATE "progress" SET "totalScore" = "totalScore" + 1, "lastActivity" = ? WHERE "userId" = ?"#,
            MarkOutcome::Added,
        )
    } else {
        (
            r#"UPDATE "progress" SET "lastActivity" = ? WHERE "userId" = ?"#,
            MarkOutcome::AlreadyCompleted,
        )
    };
    sqlx::query(sql)
        .bind(&now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(outcome)
}
