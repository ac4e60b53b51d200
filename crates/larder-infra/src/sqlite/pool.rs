//! Connection pools for the local autosave database.
//!
//! Autosaves are written once per wizard navigation and read when listing or
//! resuming sessions, so one writer connection is plenty. Listing runs on a
//! separate read-only pool so it never contends with an in-flight save.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const READER_CONNECTIONS: u32 = 2;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DatabasePool {
    /// Read-only connections for listing and loading session drafts.
    pub reader: SqlitePool,
    /// The single connection that saves and deletes session drafts.
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the autosave database at `database_url`, creating the file and
    /// applying pending migrations first.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;

        // The schema must exist before read-only connections open the file.
        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(database_url, "autosave database ready");
        Ok(Self { reader, writer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open(dir: &tempfile::TempDir) -> DatabasePool {
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("larder.db").display());
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_migrations_create_only_the_session_table() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir).await;

        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name <> '_sqlx_migrations'",
        )
        .fetch_all(&pool.reader)
        .await
        .unwrap();
        assert_eq!(names, vec!["session_drafts".to_string()]);
    }

    #[tokio::test]
    async fn test_writer_uses_wal_and_reader_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        let pool = open(&dir).await;

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(&pool.writer)
            .await
            .unwrap();
        assert!(mode.eq_ignore_ascii_case("wal"));

        let write = sqlx::query("DELETE FROM session_drafts")
            .execute(&pool.reader)
            .await;
        assert!(write.is_err());
    }

    #[tokio::test]
    async fn test_reopening_an_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        drop(open(&dir).await);
        let pool = open(&dir).await;
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM session_drafts")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
