use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Executor, FromRow, Row, Sqlite};

use super::timestamp_column;

const USER_COLUMNS: &str = "id, username, chat_id, created_at, is_admin, first_name, last_name";

/// A registered team member, keyed by the Telegram user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub chat_id: i64,
    pub created_at: DateTime<Utc>,
    pub is_admin: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            chat_id: row.try_get("chat_id")?,
            created_at: timestamp_column(row, "created_at")?,
            is_admin: row.try_get("is_admin")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
        })
    }
}

impl User {
    /// Whether both name fields have been filled in.
    pub fn has_personal_info(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.first_name) && filled(&self.last_name)
    }

    /// Inserts the user or overwrites handle, chat id and admin flag of an
    /// existing row. `created_at` is only written on first insert.
    pub async fn upsert<'e, E>(executor: E, user: &User) -> Result<(), sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, chat_id, created_at, is_admin, first_name, last_name)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                chat_id = excluded.chat_id,
                is_admin = excluded.is_admin
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(user.chat_id)
        .bind(user.created_at.timestamp_millis())
        .bind(user.is_admin)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Inserts a new member or refreshes handle and chat id of an existing one.
    ///
    /// `admin_if_new` only applies to the insert; the admin flag of an
    /// existing row is never touched here.
    pub async fn register<'e, E>(
        executor: E,
        id: i64,
        username: &str,
        chat_id: i64,
        admin_if_new: bool,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            r#"
            INSERT INTO users (id, username, chat_id, created_at, is_admin)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                chat_id = excluded.chat_id
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(username)
            .bind(chat_id)
            .bind(Utc::now().timestamp_millis())
            .bind(admin_if_new)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Handles are not unique; the oldest registration wins.
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? ORDER BY created_at, id LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_chat_id<'e, E>(
        executor: E,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE chat_id = ? ORDER BY created_at, id LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(chat_id)
            .fetch_optional(executor)
            .await
    }

    pub async fn exists<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(executor)
            .await?;

        Ok(count > 0)
    }

    /// Unknown users are not admins.
    pub async fn is_admin<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let is_admin = sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(is_admin.unwrap_or(false))
    }

    /// Returns the number of rows updated (0 when the user is unknown).
    pub async fn set_admin_status<'e, E>(
        executor: E,
        id: i64,
        is_admin: bool,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
            .bind(is_admin)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Returns the number of rows updated (0 when the user is unknown).
    pub async fn set_personal_info<'e, E>(
        executor: E,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE users SET first_name = ?, last_name = ? WHERE id = ?")
            .bind(first_name)
            .bind(last_name)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
