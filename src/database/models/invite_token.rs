use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Executor, FromRow, Row, Sqlite};

use super::timestamp_column;

const TOKEN_COLUMNS: &str =
    "id, token, created_by, created_at, expires_at, is_active, usage_count, max_usage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteToken {
    pub id: i64,
    pub token: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub usage_count: i64,
    pub max_usage: i64,
}

/// Values for a token that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewInviteToken {
    pub token: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_usage: i64,
}

impl<'r> FromRow<'r, SqliteRow> for InviteToken {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            token: row.try_get("token")?,
            created_by: row.try_get("created_by")?,
            created_at: timestamp_column(row, "created_at")?,
            expires_at: timestamp_column(row, "expires_at")?,
            is_active: row.try_get("is_active")?,
            usage_count: row.try_get("usage_count")?,
            max_usage: row.try_get("max_usage")?,
        })
    }
}

impl InviteToken {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_exhausted(&self) -> bool {
        self.usage_count >= self.max_usage
    }

    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now) && !self.is_exhausted()
    }

    /// Time left before expiry, `None` once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        let left = self.expires_at.signed_duration_since(now);
        (left > Duration::zero()).then_some(left)
    }

    /// Stores a new active token with a zero usage counter.
    ///
    /// Fails on the single-active index if another active token still exists,
    /// so callers deactivate first within the same transaction.
    pub async fn insert<'e, E>(executor: E, new: &NewInviteToken) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            r#"
            INSERT INTO invite_tokens (token, created_by, created_at, expires_at, is_active, usage_count, max_usage)
            VALUES (?, ?, ?, ?, TRUE, 0, ?)
            RETURNING {TOKEN_COLUMNS}
            "#
        );

        sqlx::query_as::<_, InviteToken>(&query)
            .bind(&new.token)
            .bind(new.created_by)
            .bind(new.created_at.timestamp_millis())
            .bind(new.expires_at.timestamp_millis())
            .bind(new.max_usage)
            .fetch_one(executor)
            .await
    }

    /// The active, unexpired token. Tolerates zero rows; if several rows were
    /// ever active the newest wins.
    pub async fn find_active<'e, E>(
        executor: E,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            r#"
            SELECT {TOKEN_COLUMNS} FROM invite_tokens
            WHERE is_active = TRUE AND expires_at > ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#
        );

        sqlx::query_as::<_, InviteToken>(&query)
            .bind(now.timestamp_millis())
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_token<'e, E>(executor: E, token: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {TOKEN_COLUMNS} FROM invite_tokens WHERE token = ?");
        sqlx::query_as::<_, InviteToken>(&query)
            .bind(token)
            .fetch_optional(executor)
            .await
    }

    /// Returns how many tokens were switched off.
    pub async fn deactivate_all<'e, E>(executor: E) -> Result<u64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE invite_tokens SET is_active = FALSE WHERE is_active = TRUE")
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }

    /// Bumps the usage counter unless the ceiling is already reached.
    /// Returns `false` when nothing was incremented.
    pub async fn increment_usage<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE invite_tokens SET usage_count = usage_count + 1 WHERE id = ? AND usage_count < max_usage",
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Consumes one use of a redeemable token in a single conditional update.
    ///
    /// Returns the token with the incremented counter, or `None` if the token
    /// is unknown, inactive, expired at `now`, or exhausted.
    pub async fn try_consume<'e, E>(
        executor: E,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            r#"
            UPDATE invite_tokens
            SET usage_count = usage_count + 1
            WHERE token = ?
              AND is_active = TRUE
              AND expires_at > ?
              AND usage_count < max_usage
            RETURNING {TOKEN_COLUMNS}
            "#
        );

        sqlx::query_as::<_, InviteToken>(&query)
            .bind(token)
            .bind(now.timestamp_millis())
            .fetch_optional(executor)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_at(now: DateTime<Utc>) -> InviteToken {
        InviteToken {
            id: 1,
            token: "abc".to_string(),
            created_by: 7,
            created_at: now,
            expires_at: now + Duration::hours(24),
            is_active: true,
            usage_count: 0,
            max_usage: 2,
        }
    }

    #[test]
    fn test_redeemable_requires_all_conditions() {
        let now = Utc::now();
        let token = token_at(now);
        assert!(token.is_redeemable_at(now));

        let inactive = InviteToken { is_active: false, ..token.clone() };
        assert!(!inactive.is_redeemable_at(now));

        let exhausted = InviteToken { usage_count: 2, ..token.clone() };
        assert!(!exhausted.is_redeemable_at(now));

        assert!(!token.is_redeemable_at(token.expires_at));
    }

    #[test]
    fn test_remaining_time() {
        let now = Utc::now();
        let token = token_at(now);
        assert_eq!(token.remaining_at(now), Some(Duration::hours(24)));
        assert_eq!(token.remaining_at(now + Duration::hours(24)), None);
        assert_eq!(token.remaining_at(now + Duration::hours(30)), None);
    }
}
