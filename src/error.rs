//! Error types shared by the services and the dispatcher.
//!
//! Business outcomes (unknown token, denied access, ...) are regular variants
//! the caller renders to the user. Only [`StorageError`] represents an
//! infrastructure failure that aborts the current command.

/// The database could not complete a query.
#[derive(Debug, thiserror::Error)]
#[error("storage error: {0}")]
pub struct StorageError(#[from] pub sqlx::Error);

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for DirectoryError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(StorageError(err))
    }
}

/// Why a new invite could not be issued.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("invalid validity window: {0} hours")]
    InvalidValidity(i64),

    #[error("invalid usage limit: {0}")]
    InvalidMaxUsage(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for IssueError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(StorageError(err))
    }
}

/// Why an invite token could not be redeemed.
///
/// Variants are listed in the order they are checked.
#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    #[error("token not found")]
    NotFound,

    #[error("token is no longer active")]
    Inactive,

    #[error("token has expired")]
    Expired,

    #[error("token usage limit reached")]
    Exhausted,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for RedeemError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(StorageError(err))
    }
}

impl RedeemError {
    /// Short text shown to the person who tried to join.
    pub fn user_message(&self) -> &'static str {
        match self {
            RedeemError::NotFound => "This invite link is not valid.",
            RedeemError::Inactive => {
                "This invite link has been replaced by a newer one. Ask an admin for the current link."
            }
            RedeemError::Expired => "This invite link has expired. Ask an admin for a new one.",
            RedeemError::Exhausted => {
                "This invite link has reached its usage limit. Ask an admin for a new one."
            }
            RedeemError::Storage(_) => "Something went wrong on our side. Please try again later.",
        }
    }

    /// Expected outcomes are everything except storage failures.
    pub fn is_expected(&self) -> bool {
        !matches!(self, RedeemError::Storage(_))
    }
}
