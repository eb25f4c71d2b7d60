//! Generic record operations shared by all three kinds.
//!
//! Writes go through a transaction and always leave the row with
//! `is_synced = 0`. Nothing in this module can set the flag.

use rusqlite::types::{Type, Value};
use rusqlite::{params_from_iter, Connection, Row, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use emtc_types::{Record, SurveyFields};

use crate::{DbError, Result};

/// Envelope columns every record table carries, in select order.
const ENVELOPE: &str = "id, created_at, updated_at, is_synced, version";

/// Largest page `list` will return.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Mapping between a field set and its table.
///
/// `COLUMNS` and `to_values` must list the same columns in the same order.
pub trait Table: SurveyFields {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn to_values(&self) -> Result<Vec<Value>>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub(crate) fn select_sql<T: Table>(tail: &str) -> String {
    format!(
        "SELECT {ENVELOPE}, {} FROM {} {tail}",
        T::COLUMNS.join(", "),
        T::TABLE
    )
}

pub(crate) fn map_record<T: Table>(row: &Row<'_>) -> rusqlite::Result<Record<T>> {
    Ok(Record {
        id: row.get("id")?,
        fields: T::from_row(row)?,
        created_at: row.get::<_, i64>("created_at")? as u64,
        updated_at: row.get::<_, i64>("updated_at")? as u64,
        is_synced: row.get("is_synced")?,
        version: row.get::<_, i64>("version")? as u64,
    })
}

pub(crate) fn not_found<T: Table>(id: i64) -> DbError {
    DbError::NotFound(format!("{} record {id}", T::KIND))
}

/// Encode a sub-document list for its TEXT column.
pub(crate) fn encode_items<S: Serialize>(items: &[S]) -> Result<Value> {
    serde_json::to_string(items)
        .map(Value::Text)
        .map_err(|e| DbError::Serialization(e.to_string()))
}

/// Decode a sub-document list from its TEXT column.
pub(crate) fn decode_items<D: DeserializeOwned>(
    row: &Row<'_>,
    column: &str,
) -> rusqlite::Result<Vec<D>> {
    let text: String = row.get(column)?;
    serde_json::from_str(&text).map_err(|e| {
        let idx = row.as_ref().column_index(column).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
    })
}

pub(crate) fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

pub(crate) fn int(value: u32) -> Value {
    Value::Integer(i64::from(value))
}

/// Insert a new record. The id is assigned by SQLite and never reused.
pub fn create<T: Table>(conn: &mut Connection, fields: &T, now: u64) -> Result<Record<T>> {
    let mut values = fields.to_values()?;
    let n = T::COLUMNS.len();
    let placeholders = (1..=n)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}, created_at, updated_at, is_synced, version)
         VALUES ({placeholders}, ?{ts}, ?{ts}, 0, 1)",
        T::TABLE,
        T::COLUMNS.join(", "),
        ts = n + 1,
    );
    values.push(Value::Integer(now as i64));

    let tx = conn.transaction()?;
    tx.execute(&sql, params_from_iter(values))?;
    let id = tx.last_insert_rowid();
    let record = get::<T>(&tx, id)?;
    tx.commit()?;

    info!("{} record created - ID: {id}, {}", T::KIND, record.fields.label());
    Ok(record)
}

/// Get a record by id.
pub fn get<T: Table>(conn: &Connection, id: i64) -> Result<Record<T>> {
    conn.query_row(&select_sql::<T>("WHERE id = ?1"), [id], map_record::<T>)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => not_found::<T>(id),
            other => DbError::Sqlite(other),
        })
}

/// List records in id order. `limit` is capped at [`MAX_PAGE_SIZE`].
pub fn list<T: Table>(conn: &Connection, offset: u32, limit: u32) -> Result<Vec<Record<T>>> {
    let mut stmt = conn.prepare(&select_sql::<T>("ORDER BY id LIMIT ?1 OFFSET ?2"))?;
    let rows = stmt
        .query_map(
            [i64::from(limit.min(MAX_PAGE_SIZE)), i64::from(offset)],
            map_record::<T>,
        )?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Total number of records of this kind.
pub fn count<T: Table>(conn: &Connection) -> Result<u64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", T::TABLE),
        [],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}

/// Apply a partial update.
///
/// The row is read, patched and rewritten in one transaction together with
/// `updated_at`, `is_synced = 0` and `version + 1`. The flag is cleared even
/// when the patch changes nothing. A missing id writes nothing. Concurrent
/// updates from other connections serialize on the write lock.
pub fn update<T: Table>(
    conn: &mut Connection,
    id: i64,
    patch: T::Patch,
    now: u64,
) -> Result<Record<T>> {
    // Write lock up front; a deferred read-then-write cannot wait on busy_timeout.
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut fields = get::<T>(&tx, id)?.fields;
    fields.apply(patch);

    let mut values = fields.to_values()?;
    let n = T::COLUMNS.len();
    let assignments = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {} SET {assignments}, updated_at = ?{}, is_synced = 0, version = version + 1
         WHERE id = ?{}",
        T::TABLE,
        n + 1,
        n + 2,
    );
    values.push(Value::Integer(now as i64));
    values.push(Value::Integer(id));

    tx.execute(&sql, params_from_iter(values))?;
    let record = get::<T>(&tx, id)?;
    tx.commit()?;

    info!(
        "{} record updated - ID: {id}, version {}",
        T::KIND,
        record.version
    );
    Ok(record)
}
