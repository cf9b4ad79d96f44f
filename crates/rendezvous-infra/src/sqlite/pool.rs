//! SQLite connection pools for the chat store.
//!
//! Accounts, conversations and messages all live in one WAL-mode database
//! file. Writes go through a pool capped at one connection so SQLite never
//! sees two concurrent writers; history reads use a separate read-only pool.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Read-only connections kept for history and settings lookups.
const READER_CONNECTIONS: u32 = 8;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Reader and writer handles onto the same database file.
///
/// Repositories run SELECTs on `reader` and every mutation on `writer`.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if needed) the database at `database_url` and apply
    /// pending migrations.
    ///
    /// The reader pool is only connected once the schema is current.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(options.read_only(true))
            .await?;

        tracing::debug!(url = database_url, "database pools ready");
        Ok(Self { reader, writer })
    }
}

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "rendezvous.db";

/// SQLite URL for the database inside `data_dir`
/// (`{data_dir}/rendezvous.db`).
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}", data_dir.join(DATABASE_FILE).display())
}
