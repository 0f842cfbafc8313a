use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use crate::db::{now_iso, ProgressStore, StoreError};

pub const USER_TYPE_CHILD: &str = "child";

#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: String,
    pub created_at: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_child(&self) -> bool {
        self.user_type == USER_TYPE_CHILD
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password_hash: String,
    pub user_type: String,
}

fn map_user(row: &SqliteRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        first_name: row.try_get("firstName")?,
        last_name: row.try_get("lastName")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("passwordHash")?,
        user_type: row.try_get("userType")?,
        created_at: row.try_get("createdAt")?,
    })
}

/// Insert a user, and for children their empty progress row, in one transaction
pub async fn insert_user(store: &ProgressStore, user: &NewUser) -> Result<UserRecord, StoreError> {
    let record = UserRecord {
        id: Uuid::new_v4().to_string(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        username: user.username.clone(),
        password_hash: user.password_hash.clone(),
        user_type: user.user_type.to_lowercase(),
        created_at: now_iso(),
    };

    let mut tx = store.pool().begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO "users" ("id", "firstName", "lastName", "username", "passwordHash", "userType", "createdAt")
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.first_name)
    .bind(&record.last_name)
    .bind(&record.username)
    .bind(&record.password_hash)
    .bind(&record.user_type)
    .bind(&record.created_at)
    .execute(&mut *tx)
    .await;

    if let Err(err) = inserted {
        if is_unique_violation(&err) {
            return Err(StoreError::Conflict(format!(
                "username {} already registered",
                record.username
            )));
        }
        return Err(err.into());
    }

    if record.is_child() {
        sqlx::query(
            r#"INSERT OR IGNORE INTO "progress" ("userId", "childName", "totalScore") VALUES (?, ?, 0)"#,
        )
        .bind(&record.id)
        .bind(record.full_name())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(record)
}

pub async fn find_user_by_username(
    store: &ProgressStore,
    username: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let row = sqlx::query(r#"SELECT * FROM "users" WHERE "username" = ? LIMIT 1"#)
        .bind(username)
        .fetch_optional(store.pool())
        .await?;
    Ok(row.as_ref().map(map_user).transpose()?)
}

pub async fn find_user_by_id(
    store: &ProgressStore,
    user_id: &str,
) -> Result<Option<UserRecord>, StoreError> {
    let row = sqlx::query(r#"SELECT * FROM "users" WHERE "id" = ? LIMIT 1"#)
        .bind(user_id)
        .fetch_optional(store.pool())
        .await?;
    Ok(row.as_ref().map(map_user).transpose()?)
}

/// Child accounts in registration order
pub async fn list_children(store: &ProgressStore) -> Result<Vec<UserRecord>, StoreError> {
    let rows = sqlx::query(r#"SELECT * FROM "users" WHERE "userType" = ? ORDER BY "createdAt", rowid"#)
        .bind(USER_TYPE_CHILD)
        .fetch_all(store.pool())
        .await?;
    Ok(rows.iter().map(map_user).collect::<Result<Vec<_>, _>>()?)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
