//! Service info, health and statistics handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::json;

use super::Result;
use crate::http::{success, ApiError};
use crate::DaemonState;

const SERVICE: &str = "eMTC Survey API";

/// `GET /`
pub async fn root() -> Result {
    Ok(Json(json!({
        "message": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "api": "/api/v1",
    })))
}

/// `GET /health`: process liveness only.
pub async fn health() -> Result {
    Ok(Json(json!({
        "status": "healthy",
        "service": SERVICE,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// `GET /api/v1/ping`: liveness plus a database round trip.
pub async fn ping(State(state): State<Arc<DaemonState>>) -> Result {
    let db = state.db.lock().await;
    emtc_db::ping(&db).map_err(|e| ApiError::db("Database ping failed", e))?;
    Ok(Json(json!({
        "status": "healthy",
        "timestamp": state.now_secs(),
        "database": "connected",
    })))
}

/// `GET /api/v1/stats`
pub async fn stats(State(state): State<Arc<DaemonState>>) -> Result {
    let db = state.db.lock().await;
    let stats = emtc_db::queries::stats::collect(&db)
        .map_err(|e| ApiError::db("Failed to retrieve database statistics", e))?;
    let data = serde_json::to_value(stats).map_err(|e| {
        ApiError::db(
            "Failed to retrieve database statistics",
            emtc_db::DbError::Serialization(e.to_string()),
        )
    })?;
    Ok(success("Database statistics retrieved successfully", data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await.expect("health");
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_ping_reports_database() {
        let h = harness();
        let Json(body) = ping(State(h.state.clone())).await.expect("ping");
        assert_eq!(body["database"], "connected");
        assert_eq!(body["timestamp"], 1_700_000_000_u64);
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let h = harness();
        let Json(body) = stats(State(h.state.clone())).await.expect("stats");
        assert_eq!(body["data"]["total_dpr"], 0);
        assert_eq!(body["data"]["unsynced_fp"], 0);
    }
}
