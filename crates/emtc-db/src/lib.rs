//! # emtc-db
//!
//! Persistence for eMTC survey submissions.
//! Manages the single SQLite database at `$EMTC_DATA_DIR/emtc.db`.
//!
//! ## Schema
//!
//! - One table per record kind (`dpr`, `mpr`, `fp`)
//! - Sub-documents stored as a JSON array in a TEXT column
//! - All timestamps are Unix epoch seconds
//! - Every row carries `is_synced` and a `version` mutation counter
//! - Schema version stored in `PRAGMA user_version`
//!
//! ## Sync flag
//!
//! [`queries::records`] is the only writer of record fields and always
//! clears `is_synced`. [`sync`] is the only code that sets it.

pub mod migrations;
pub mod queries;
pub mod schema;
pub mod sync;

#[cfg(test)]
pub(crate) mod fixtures;

use rusqlite::Connection;
use std::path::Path;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl DbError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DbError::Sqlite(_))
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Open or create the database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA busy_timeout = 5000;
         PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA synchronous = NORMAL;",
    )?;
    Ok(())
}

/// Cheap liveness probe used by the health endpoint.
pub fn ping(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let conn = open_memory().expect("open in-memory db");
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .expect("get user_version");
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_open_file_twice() {
        let dir = std::env::temp_dir().join(format!("emtc-db-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("emtc.db");
        let _ = std::fs::remove_file(&path);

        drop(open(&path).expect("first open"));
        let conn = open(&path).expect("reopen runs no migration");
        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("get journal_mode");
        assert_eq!(mode, "wal");

        drop(conn);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_ping() {
        let conn = open_memory().expect("open");
        ping(&conn).expect("ping");
    }

    #[test]
    fn test_retryable() {
        assert!(DbError::Sqlite(rusqlite::Error::InvalidQuery).is_retryable());
        assert!(!DbError::NotFound("dpr record 1".into()).is_retryable());
    }
}
