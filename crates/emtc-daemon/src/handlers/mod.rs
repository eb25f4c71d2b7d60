//! HTTP request handlers.
//!
//! Each submodule implements the routes for one category.

pub mod diagnostics;
pub mod otp;
pub mod records;

use axum::Json;
use serde_json::Value;

use crate::http::ApiError;

type Result = std::result::Result<Json<Value>, ApiError>;
