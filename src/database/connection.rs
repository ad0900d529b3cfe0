use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Writers wait this long for the SQLite write lock before surfacing `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(database_url: &str) -> Result<Self> {
        if let Some(parent) = sqlite_file_path(database_url).and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating directory {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }

        // Create database if it doesn't exist
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// File behind a `sqlite:` url, `None` for in-memory databases.
pub fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("//").unwrap_or(path);
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(Path::new(path))
}

/// Deletes a SQLite database file together with its `-wal` and `-shm`
/// sidecars. Returns the paths that existed and were removed.
pub fn remove_database_files(db_path: &Path) -> io::Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for suffix in ["", "-wal", "-shm"] {
        let mut name = OsString::from(db_path.as_os_str());
        name.push(suffix);
        let path = PathBuf::from(name);

        match std::fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_remove_database_files_includes_wal_sidecars() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("team.db");
        for name in ["team.db", "team.db-wal", "team.db-shm", "other.db"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let removed = remove_database_files(&db_path).unwrap();

        assert_eq!(removed.len(), 3);
        assert!(!db_path.exists());
        assert!(!dir.path().join("team.db-wal").exists());
        assert!(!dir.path().join("team.db-shm").exists());
        assert!(dir.path().join("other.db").exists());
    }

    #[test]
    fn test_remove_database_files_when_nothing_exists() {
        let dir = tempdir().unwrap();
        let removed = remove_database_files(&dir.path().join("missing.db")).unwrap();
        assert!(removed.is_empty());
    }

    #[tokio::test]
    async fn test_reset_leaves_no_wal_files_behind() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("team.db");
        let db = DatabaseManager::new(&format!("sqlite:{}", db_path.display()))
            .await
            .unwrap();
        db.run_migrations().await.unwrap();
        db.pool.close().await;

        remove_database_files(&db_path).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_sqlite_file_path() {
        assert_eq!(
            sqlite_file_path("sqlite:./data/team_bot.db"),
            Some(Path::new("./data/team_bot.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/x.db?mode=rwc"),
            Some(Path::new("/tmp/x.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/db"), None);
    }
}
