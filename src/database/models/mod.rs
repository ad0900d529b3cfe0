pub mod invite_token;
pub mod user;

pub use invite_token::*;
pub use user::*;

use chrono::{DateTime, TimeZone, Utc};
use sqlx::{sqlite::SqliteRow, Row};

/// Reads a unix-milliseconds column as a UTC timestamp.
pub(crate) fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    let millis: i64 = row.try_get(column)?;
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: format!("timestamp {millis} out of range").into(),
        })
}
