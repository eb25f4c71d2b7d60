//! Sync coordination.
//!
//! The only module that sets `is_synced`. A sync agent lists unsynced
//! records, propagates them, then marks each one synced with the `version`
//! it read. If a write landed in between, the version no longer matches and
//! the record stays unsynced for the next pass.

use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use tracing::{info, warn};

use emtc_types::Record;

use crate::queries::records::{map_record, select_sql, Table};
use crate::Result;

/// Result of a mark-synced attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MarkOutcome {
    /// Flag set (or already set) at the observed version.
    Marked,
    /// The record changed after the agent read it; left unsynced.
    Stale { current_version: u64 },
    NotFound,
}

/// All records of a kind still waiting for propagation, in id order.
pub fn list_unsynced<T: Table>(conn: &Connection) -> Result<Vec<Record<T>>> {
    let mut stmt = conn.prepare(&select_sql::<T>("WHERE is_synced = 0 ORDER BY id"))?;
    let rows = stmt
        .query_map([], map_record::<T>)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Number of records of a kind still waiting for propagation.
pub fn count_unsynced<T: Table>(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE is_synced = 0", T::TABLE),
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Mark a record synced if it is still at `observed_version`.
///
/// Touches only `is_synced`; `version` and `updated_at` are left alone, so
/// repeating the call is harmless.
pub fn mark_synced<T: Table>(
    conn: &mut Connection,
    id: i64,
    observed_version: u64,
) -> Result<MarkOutcome> {
    let tx = conn.transaction()?;
    let updated = tx.execute(
        &format!(
            "UPDATE {} SET is_synced = 1 WHERE id = ?1 AND version = ?2",
            T::TABLE
        ),
        rusqlite::params![id, observed_version as i64],
    )?;

    let outcome = if updated == 1 {
        MarkOutcome::Marked
    } else {
        let current: Option<i64> = tx
            .query_row(
                &format!("SELECT version FROM {} WHERE id = ?1", T::TABLE),
                [id],
                |row| row.get(0),
            )
            .optional()?;
        match current {
            Some(version) => MarkOutcome::Stale {
                current_version: version as u64,
            },
            None => MarkOutcome::NotFound,
        }
    };
    tx.commit()?;

    match outcome {
        MarkOutcome::Marked => info!("{} sync status updated - ID: {id}, Synced: true", T::KIND),
        MarkOutcome::Stale { current_version } => warn!(
            "{} record {id} changed since sync read (v{observed_version} -> v{current_version}); left unsynced",
            T::KIND
        ),
        MarkOutcome::NotFound => {}
    }
    Ok(outcome)
}

/// Mark a record synced regardless of intervening writes.
///
/// Returns whether the record exists. A write that lands between the
/// agent's read and this call is marked synced without having been
/// propagated; prefer [`mark_synced`].
pub fn mark_synced_unconditional<T: Table>(conn: &Connection, id: i64) -> Result<bool> {
    let updated = conn.execute(
        &format!("UPDATE {} SET is_synced = 1 WHERE id = ?1", T::TABLE),
        [id],
    )?;
    Ok(updated == 1)
}
