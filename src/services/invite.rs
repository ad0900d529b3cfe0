use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::database::models::{InviteToken, NewInviteToken, User};
use crate::error::{IssueError, RedeemError, StorageError};
use crate::utils::logging::log_invite_event;

/// Random bytes per token (128 bits).
const TOKEN_BYTES: usize = 16;

/// Who is joining through an invite.
#[derive(Debug, Clone)]
pub struct Registration {
    pub actor_id: i64,
    pub username: String,
    pub chat_id: i64,
    /// Admin flag to store if this is the actor's first registration.
    pub admin_if_new: bool,
}

/// Issues and redeems invite tokens.
///
/// Only one token is ever active: issuing a new one switches off every
/// older token in the same transaction. Redemption consumes a use with a
/// single conditional update, so concurrent redeemers can never push
/// `usage_count` past `max_usage`.
#[derive(Clone)]
pub struct InviteService {
    pool: SqlitePool,
}

impl InviteService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 32 lowercase hex characters from the OS CSPRNG.
    pub fn generate_token() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Issues a new active token and switches off every older one.
    ///
    /// Parameters are checked before anything is written, so a rejected
    /// request leaves the current invite in place.
    pub async fn create_invite(
        &self,
        creator_id: i64,
        validity_hours: i64,
        max_usage: i64,
    ) -> Result<InviteToken, IssueError> {
        if max_usage <= 0 {
            return Err(IssueError::InvalidMaxUsage(max_usage));
        }

        let now = Utc::now();
        let expires_at = expiry_after(now, validity_hours)
            .ok_or(IssueError::InvalidValidity(validity_hours))?;
        let new = NewInviteToken {
            token: Self::generate_token(),
            created_by: creator_id,
            created_at: now,
            expires_at,
            max_usage,
        };

        let mut tx = self.pool.begin().await?;
        let deactivated = InviteToken::deactivate_all(&mut *tx).await?;
        let token = InviteToken::insert(&mut *tx, &new).await?;
        tx.commit().await?;

        log_invite_event(
            "CREATED",
            &format!(
                "token #{} by {} (max {} uses, expires {}), {} previous deactivated",
                token.id, creator_id, token.max_usage, token.expires_at, deactivated
            ),
        );

        Ok(token)
    }

    /// The invite currently handed out, if any.
    pub async fn current_invite(&self) -> Result<Option<InviteToken>, StorageError> {
        Ok(InviteToken::find_active(&self.pool, Utc::now()).await?)
    }

    /// Consumes one use of `token` and returns it with the new counter.
    pub async fn redeem(&self, token: &str) -> Result<InviteToken, RedeemError> {
        let now = Utc::now();
        match InviteToken::try_consume(&self.pool, token, now).await? {
            Some(consumed) => {
                log_redeemed(&consumed);
                Ok(consumed)
            }
            None => Err(rejected(Self::classify_failure(&self.pool, token, now).await)),
        }
    }

    /// Redeems `token` and registers the actor atomically: if the user write
    /// fails, the consumed use is rolled back.
    pub async fn redeem_and_register(
        &self,
        token: &str,
        registration: &Registration,
    ) -> Result<(InviteToken, User), RedeemError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let Some(consumed) = InviteToken::try_consume(&mut *tx, token, now).await? else {
            let err = Self::classify_failure(&mut *tx, token, now).await;
            return Err(rejected(err));
        };

        let user = User::register(
            &mut *tx,
            registration.actor_id,
            &registration.username,
            registration.chat_id,
            registration.admin_if_new,
        )
        .await?;
        tx.commit().await?;

        log_redeemed(&consumed);
        Ok((consumed, user))
    }

    pub fn format_invite_link(bot_username: &str, token: &str) -> String {
        format!("https://t.me/{bot_username}?start={token}")
    }

    /// Explains a failed conditional update. Checks run in a fixed order so
    /// the caller always reports the first reason that applies.
    async fn classify_failure<'e, E>(executor: E, token: &str, now: DateTime<Utc>) -> RedeemError
    where
        E: Executor<'e, Database = Sqlite>,
    {
        match InviteToken::find_by_token(executor, token).await {
            Err(e) => e.into(),
            Ok(None) => RedeemError::NotFound,
            Ok(Some(t)) if !t.is_active => RedeemError::Inactive,
            Ok(Some(t)) if t.is_expired_at(now) => RedeemError::Expired,
            // Exhausted, or another redeemer took the last use first
            Ok(Some(_)) => RedeemError::Exhausted,
        }
    }
}

/// `now` plus a positive number of hours, `None` if that is not a
/// representable instant.
fn expiry_after(now: DateTime<Utc>, validity_hours: i64) -> Option<DateTime<Utc>> {
    if validity_hours <= 0 {
        return None;
    }
    Duration::try_hours(validity_hours).and_then(|validity| now.checked_add_signed(validity))
}

fn log_redeemed(token: &InviteToken) {
    log_invite_event(
        "REDEEMED",
        &format!("token #{} now at {}/{}", token.id, token.usage_count, token.max_usage),
    );
}

fn rejected(err: RedeemError) -> RedeemError {
    if err.is_expected() {
        log_invite_event("REJECTED", &err.to_string());
    }
    err
}
