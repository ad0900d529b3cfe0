use std::sync::Arc;

use crate::database::models::User;
use crate::services::directory::UserDirectory;
use crate::utils::logging::log_database_error;

/// Privilege level of an actor as seen by the command handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Guest,
    Member,
    Admin,
}

impl Role {
    pub fn of(user: Option<&User>) -> Self {
        match user {
            None => Role::Guest,
            Some(user) if user.is_admin => Role::Admin,
            Some(_) => Role::Member,
        }
    }
}

/// Decides whether an actor may run a command.
///
/// Checks never fail: a storage error is logged and treated as a denial.
#[derive(Clone)]
pub struct AccessGate {
    directory: UserDirectory,
    admin_usernames: Arc<[String]>,
}

impl AccessGate {
    pub fn new(directory: UserDirectory, admin_usernames: Vec<String>) -> Self {
        Self {
            directory,
            admin_usernames: admin_usernames.into(),
        }
    }

    pub async fn check_registered(&self, actor_id: i64) -> bool {
        match self.directory.exists(actor_id).await {
            Ok(exists) => exists,
            Err(e) => {
                log_database_error("EXISTS", "users", &e.to_string());
                false
            }
        }
    }

    pub async fn check_admin(&self, actor_id: i64) -> bool {
        match self.directory.is_admin(actor_id).await {
            Ok(is_admin) => is_admin,
            Err(e) => {
                log_database_error("IS_ADMIN", "users", &e.to_string());
                false
            }
        }
    }

    /// Exact, case-sensitive match against the configured handles. Only
    /// consulted when an actor registers for the first time.
    pub fn is_configured_admin_handle(&self, handle: &str) -> bool {
        !handle.is_empty() && self.admin_usernames.iter().any(|admin| admin == handle)
    }
}
