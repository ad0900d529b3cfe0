use sqlx::SqlitePool;

use crate::database::models::User;
use crate::error::{DirectoryError, StorageError};
use crate::utils::logging::log_database_operation;

/// Registered users and their admin flag.
///
/// Lookups report a missing user as `None`/`false`; only genuine storage
/// failures come back as errors.
#[derive(Clone)]
pub struct UserDirectory {
    pool: SqlitePool,
}

impl UserDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Full overwrite of handle, chat id and admin flag. Reserved for
    /// privileged callers; chat interactions go through [`Self::register`].
    pub async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        log_database_operation("UPSERT", "users", Some(&user.id.to_string()));
        User::upsert(&self.pool, user).await?;
        Ok(())
    }

    /// Creates the member on first contact (with `admin_if_new` as the initial
    /// flag) or refreshes handle and chat id of an existing one.
    pub async fn register(
        &self,
        actor_id: i64,
        username: &str,
        chat_id: i64,
        admin_if_new: bool,
    ) -> Result<User, StorageError> {
        log_database_operation("REGISTER", "users", Some(&actor_id.to_string()));
        Ok(User::register(&self.pool, actor_id, username, chat_id, admin_if_new).await?)
    }

    pub async fn get_by_id(&self, actor_id: i64) -> Result<Option<User>, StorageError> {
        Ok(User::find_by_id(&self.pool, actor_id).await?)
    }

    pub async fn get_by_handle(&self, username: &str) -> Result<Option<User>, StorageError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    pub async fn get_by_chat(&self, chat_id: i64) -> Result<Option<User>, StorageError> {
        Ok(User::find_by_chat_id(&self.pool, chat_id).await?)
    }

    pub async fn exists(&self, actor_id: i64) -> Result<bool, StorageError> {
        Ok(User::exists(&self.pool, actor_id).await?)
    }

    pub async fn is_admin(&self, actor_id: i64) -> Result<bool, StorageError> {
        Ok(User::is_admin(&self.pool, actor_id).await?)
    }

    pub async fn set_admin_status(&self, actor_id: i64, is_admin: bool) -> Result<(), DirectoryError> {
        log_database_operation("SET_ADMIN", "users", Some(&format!("{actor_id} -> {is_admin}")));
        match User::set_admin_status(&self.pool, actor_id, is_admin).await? {
            0 => Err(DirectoryError::NotFound(actor_id)),
            _ => Ok(()),
        }
    }

    pub async fn set_personal_info(
        &self,
        actor_id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), DirectoryError> {
        log_database_operation("SET_PERSONAL_INFO", "users", Some(&actor_id.to_string()));
        match User::set_personal_info(&self.pool, actor_id, first_name, last_name).await? {
            0 => Err(DirectoryError::NotFound(actor_id)),
            _ => Ok(()),
        }
    }
}
