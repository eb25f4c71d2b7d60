//! OTP challenge handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use emtc_types::ValidationError;

use super::Result;
use crate::http::{ApiError, ApiJson};
use crate::DaemonState;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub identifier: String,
    pub purpose: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub identifier: String,
    pub purpose: String,
    pub code: String,
}

fn require(field: &'static str, value: &str) -> std::result::Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field }.into());
    }
    Ok(())
}

/// Issue a challenge and hand it to the delivery channel.
///
/// Always reports the code as sent once the request is well-formed.
pub async fn send(State(state): State<Arc<DaemonState>>, ApiJson(req): ApiJson<SendRequest>) -> Result {
    require("identifier", &req.identifier)?;
    require("purpose", &req.purpose)?;

    state
        .otp
        .send_challenge(&req.identifier, &req.purpose, state.delivery.as_ref());

    Ok(Json(json!({
        "status": "success",
        "message": "OTP sent successfully",
        "otp_sent": true,
        "identifier": req.identifier,
    })))
}

/// Check a submitted code. Every outcome is a 200.
pub async fn verify(
    State(state): State<Arc<DaemonState>>,
    ApiJson(req): ApiJson<VerifyRequest>,
) -> Result {
    require("identifier", &req.identifier)?;
    require("purpose", &req.purpose)?;

    let outcome = state
        .otp
        .verify_challenge(&req.identifier, &req.purpose, req.code.trim());

    Ok(Json(json!({
        "verified": outcome.is_success(),
        "outcome": outcome,
        "message": outcome.message(),
    })))
}
