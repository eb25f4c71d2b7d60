//! Survey record handlers.
//!
//! One set of routes serves all three kinds; the `:kind` path segment picks
//! the field set and every handler body is generic over [`Table`].

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use emtc_db::queries::records::{self, Table};
use emtc_db::sync::{self, MarkOutcome};
use emtc_db::DbError;
use emtc_types::{CentreSummary, Demographic, Purchase, RecordKind, Validate, ValidationError};

use super::Result;
use crate::http::{success, ApiError, ApiJson, ApiPath, ApiQuery};
use crate::DaemonState;

/// Default page size for listings.
const DEFAULT_LIMIT: u32 = 100;

/// `?skip=&limit=` query.
#[derive(Debug, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Body of a mark-synced call: the version the agent read.
#[derive(Debug, Deserialize)]
pub struct MarkSyncedRequest {
    pub version: u64,
}

/// Resolve the path kind and run the generic handler for its field set.
macro_rules! dispatch {
    ($kind:expr, $handler:ident($($arg:expr),* $(,)?)) => {
        match $kind.parse::<RecordKind>()? {
            RecordKind::Dpr => $handler::<Demographic>($($arg),*).await,
            RecordKind::Mpr => $handler::<Purchase>($($arg),*).await,
            RecordKind::Fp => $handler::<CentreSummary>($($arg),*).await,
        }
    };
}

fn malformed(err: serde_json::Error) -> ApiError {
    ApiError::validation(&ValidationError::Malformed {
        field: "body",
        detail: err.to_string(),
    })
}

fn to_data<S: Serialize>(value: &S) -> std::result::Result<Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::db("Failed to encode response", DbError::Serialization(e.to_string())))
}

fn title<T: Table>() -> String {
    T::KIND.as_str().to_uppercase()
}

/// `POST /records/:kind`
pub async fn create(
    State(state): State<Arc<DaemonState>>,
    ApiPath(kind): ApiPath<String>,
    ApiJson(body): ApiJson<Value>,
) -> Result {
    dispatch!(kind, create_kind(&state, body))
}

async fn create_kind<T: Table>(state: &DaemonState, body: Value) -> Result {
    let fields: T = serde_json::from_value(body).map_err(malformed)?;
    fields.validate()?;
    info!("{} submission received - {}", title::<T>(), fields.label());

    let now = state.now_secs();
    let mut db = state.db.lock().await;
    let record = records::create(&mut db, &fields, now)
        .map_err(|e| ApiError::db(&format!("Failed to create {} record", title::<T>()), e))?;

    Ok(success(
        format!("{} record created successfully", title::<T>()),
        json!({
            "kind": T::KIND,
            "id": record.id,
            "created_at": record.created_at,
            "version": record.version,
        }),
    ))
}

/// `PUT /records/:kind/:id`
pub async fn update(
    State(state): State<Arc<DaemonState>>,
    ApiPath((kind, id)): ApiPath<(String, i64)>,
    ApiJson(body): ApiJson<Value>,
) -> Result {
    dispatch!(kind, update_kind(&state, id, body))
}

async fn update_kind<T: Table>(state: &DaemonState, id: i64, body: Value) -> Result {
    let raw: T::Update = serde_json::from_value(body).map_err(malformed)?;
    let patch = T::normalize(raw)?;
    patch.validate()?;

    let now = state.now_secs();
    let mut db = state.db.lock().await;
    let record = records::update::<T>(&mut db, id, patch, now)
        .map_err(|e| ApiError::db(&format!("Failed to update {} record", title::<T>()), e))?;

    Ok(success(
        format!("{} record updated successfully", title::<T>()),
        json!({
            "kind": T::KIND,
            "id": record.id,
            "updated_at": record.updated_at,
            "version": record.version,
            "is_synced": record.is_synced,
        }),
    ))
}

/// `GET /records/:kind/:id`
pub async fn get(
    State(state): State<Arc<DaemonState>>,
    ApiPath((kind, id)): ApiPath<(String, i64)>,
) -> Result {
    dispatch!(kind, get_kind(&state, id))
}

async fn get_kind<T: Table>(state: &DaemonState, id: i64) -> Result {
    let db = state.db.lock().await;
    let record = records::get::<T>(&db, id)
        .map_err(|e| ApiError::db(&format!("Failed to read {} record", title::<T>()), e))?;
    Ok(success(
        format!("{} record retrieved successfully", title::<T>()),
        to_data(&record)?,
    ))
}

/// `GET /records/:kind?skip=&limit=`
pub async fn list(
    State(state): State<Arc<DaemonState>>,
    ApiPath(kind): ApiPath<String>,
    ApiQuery(page): ApiQuery<Page>,
) -> Result {
    dispatch!(kind, list_kind(&state, page))
}

async fn list_kind<T: Table>(state: &DaemonState, page: Page) -> Result {
    let limit = page.limit.min(records::MAX_PAGE_SIZE);
    let db = state.db.lock().await;
    let context = format!("Failed to list {} records", title::<T>());
    let rows = records::list::<T>(&db, page.skip, limit).map_err(|e| ApiError::db(&context, e))?;
    let total = records::count::<T>(&db).map_err(|e| ApiError::db(&context, e))?;

    Ok(success(
        format!("{} records retrieved successfully", title::<T>()),
        json!({
            "kind": T::KIND,
            "skip": page.skip,
            "limit": limit,
            "total": total,
            "records": to_data(&rows)?,
        }),
    ))
}

/// `GET /records/:kind/unsynced`
pub async fn list_unsynced(
    State(state): State<Arc<DaemonState>>,
    ApiPath(kind): ApiPath<String>,
) -> Result {
    dispatch!(kind, list_unsynced_kind(&state))
}

async fn list_unsynced_kind<T: Table>(state: &DaemonState) -> Result {
    let db = state.db.lock().await;
    let rows = sync::list_unsynced::<T>(&db).map_err(|e| {
        ApiError::db(&format!("Failed to list unsynced {} records", title::<T>()), e)
    })?;

    Ok(success(
        format!("Unsynced {} records retrieved successfully", title::<T>()),
        json!({
            "kind": T::KIND,
            "count": rows.len(),
            "records": to_data(&rows)?,
        }),
    ))
}

/// `POST /records/:kind/:id/synced`
pub async fn mark_synced(
    State(state): State<Arc<DaemonState>>,
    ApiPath((kind, id)): ApiPath<(String, i64)>,
    ApiJson(req): ApiJson<MarkSyncedRequest>,
) -> Result {
    dispatch!(kind, mark_synced_kind(&state, id, req.version))
}

async fn mark_synced_kind<T: Table>(state: &DaemonState, id: i64, version: u64) -> Result {
    let mut db = state.db.lock().await;
    let outcome = sync::mark_synced::<T>(&mut db, id, version).map_err(|e| {
        ApiError::db(&format!("Failed to update {} sync status", title::<T>()), e)
    })?;

    match outcome {
        MarkOutcome::Marked => Ok(success(
            format!("{} sync status updated successfully", title::<T>()),
            json!({
                "kind": T::KIND,
                "id": id,
                "marked": true,
                "outcome": outcome,
            }),
        )),
        MarkOutcome::Stale { current_version } => Err(ApiError::stale(current_version)),
        MarkOutcome::NotFound => Err(ApiError::not_found(format!(
            "{} record {id} not found",
            title::<T>()
        ))),
    }
}
