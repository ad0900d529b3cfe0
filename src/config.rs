use anyhow::{anyhow, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/team_bot.db";

/// Ten years.
pub const MAX_INVITE_VALIDITY_HOURS: i64 = 24 * 365 * 10;
pub const MAX_INVITE_USAGE: i64 = 1_000_000;

/// Validity window and usage ceiling applied to newly created invites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InviteDefaults {
    pub validity_hours: i64,
    pub max_usage: i64,
}

impl Default for InviteDefaults {
    fn default() -> Self {
        Self {
            validity_hours: 24,
            max_usage: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub database_url: String,
    pub http_port: u16,
    pub admin_usernames: Vec<String>,
    pub invite: InviteDefaults,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        Ok(Config {
            telegram_bot_token: token,
            database_url: Self::database_url_from_env(),
            http_port: Self::http_port_from_env()?,
            admin_usernames: parse_admin_usernames(
                &env::var("ADMIN_USERNAMES").unwrap_or_default(),
            ),
            invite: InviteDefaults {
                validity_hours: bounded_from_env("INVITE_VALIDITY_HOURS", 24, MAX_INVITE_VALIDITY_HOURS)?,
                max_usage: bounded_from_env("INVITE_MAX_USAGE", 50, MAX_INVITE_USAGE)?,
            },
        })
    }

    /// Only the settings needed to reach the database, for operator tooling
    /// that runs without a bot token.
    pub fn database_url_from_env() -> String {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        if database_url.trim().is_empty() {
            DEFAULT_DATABASE_URL.to_string()
        } else {
            database_url
        }
    }

    fn http_port_from_env() -> Result<u16> {
        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))
    }
}

/// Reads an integer in `1..=max`, falling back to `default` when unset or blank.
fn bounded_from_env(name: &str, default: i64, max: i64) -> Result<i64> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    if raw.trim().is_empty() {
        return Ok(default);
    }

    match raw.trim().parse::<i64>() {
        Ok(value) if (1..=max).contains(&value) => Ok(value),
        _ => Err(anyhow!("Invalid {}", name)),
    }
}

/// Splits a comma separated handle list. Entries are trimmed and a leading
/// `@` is dropped; case is preserved.
pub fn parse_admin_usernames(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .map(|s| s.strip_prefix('@').unwrap_or(s))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_usernames() {
        assert_eq!(
            parse_admin_usernames(" alice, @Bob ,,carol "),
            vec!["alice", "Bob", "carol"]
        );
        assert!(parse_admin_usernames("").is_empty());
        assert!(parse_admin_usernames(" , @ ").is_empty());
    }
}
