//! HTTP surface.
//!
//! Routes live under `/api/v1` plus the two root diagnostics routes. Every
//! failure leaves a handler as an [`ApiError`], rendered as
//! `{status: "error", message, error_code}`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tracing::error;

use emtc_db::DbError;
use emtc_types::ValidationError;

use crate::handlers::{diagnostics, otp, records};
use crate::DaemonState;

/// Build the application router.
pub fn router(state: Arc<DaemonState>) -> Router {
    let api = Router::new()
        .route("/ping", get(diagnostics::ping))
        .route("/stats", get(diagnostics::stats))
        .route("/otp/send", post(otp::send))
        .route("/otp/verify", post(otp::verify))
        .route("/records/:kind", get(records::list).post(records::create))
        .route("/records/:kind/unsynced", get(records::list_unsynced))
        .route("/records/:kind/:id", get(records::get).put(records::update))
        .route("/records/:kind/:id/synced", post(records::mark_synced));

    Router::new()
        .route("/", get(diagnostics::root))
        .route("/health", get(diagnostics::health))
        .nest("/api/v1", api)
        .with_state(state)
}

/// JSON body extractor whose rejection renders as an [`ApiError`].
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejection renders as an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query extractor whose rejection renders as an [`ApiError`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Handler error carried to the client.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            retryable: false,
        }
    }

    /// Rejected input (422).
    pub fn validation(err: &ValidationError) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_FAILED",
            err.to_string(),
        )
    }

    /// Unknown record kind in the path (404).
    pub fn unknown_kind(kind: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "UNKNOWN_KIND",
            format!("unknown record kind: {kind}"),
        )
    }

    /// Record changed after the sync agent read it (409).
    pub fn stale(current_version: u64) -> Self {
        Self::new(
            StatusCode::CONFLICT,
            "STALE_VERSION",
            format!("record changed since it was read; current version is {current_version}"),
        )
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", what)
    }

    /// Map a storage failure. Anything but `NotFound` is logged.
    pub fn db(context: &str, err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => Self::not_found(what),
            other => {
                error!("{context}: {other}");
                Self {
                    retryable: other.is_retryable(),
                    ..Self::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "PERSISTENCE_FAILED",
                        format!("{context}: {other}"),
                    )
                }
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownKind(kind) => Self::unknown_kind(&kind),
            other => Self::validation(&other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_FAILED",
            rejection.body_text(),
        )
    }
}

/// A path that does not parse (e.g. a non-numeric id) names no record.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::not_found(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_FAILED",
            rejection.body_text(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "status": "error",
            "message": self.message,
            "error_code": self.code,
        });
        if self.retryable {
            body["retryable"] = json!(true);
        }
        (self.status, Json(body)).into_response()
    }
}

/// Wrap a payload in the success envelope.
pub fn success(message: impl Into<String>, data: serde_json::Value) -> Json<serde_json::Value> {
    Json(json!({
        "status": "success",
        "message": message.into(),
        "data": data,
    }))
}
