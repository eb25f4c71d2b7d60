//! Database migration system.
//!
//! Schema version stored in `PRAGMA user_version`. Migrations are
//! forward-only.

use rusqlite::Connection;

use crate::{schema, DbError, Result, SCHEMA_VERSION};

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<()> {
    let current_version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(DbError::Sqlite)?;

    match current_version {
        0 => {
            tracing::info!("Initializing database schema v{SCHEMA_VERSION}");
            conn.execute_batch(schema::SCHEMA_V1)
                .map_err(DbError::Sqlite)?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                .map_err(DbError::Sqlite)?;
        }
        SCHEMA_VERSION => {}
        // Incremental steps (v1 -> v2, ...) slot in here once a v2 exists.
        newer => {
            return Err(DbError::Migration(format!(
                "Database version {newer} is newer than supported {SCHEMA_VERSION}"
            )));
        }
    }

    Ok(())
}
