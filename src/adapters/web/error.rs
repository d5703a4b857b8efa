//! JSON error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::domain::error::BalanceWheelError;

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const ANALYSIS_FAILED: &str = "Analysis failed";
pub const NOT_FOUND: &str = "Not found";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND)
    }

    pub fn missing_parameters() -> Self {
        Self::new(StatusCode::BAD_REQUEST, MISSING_PARAMETERS)
    }

    pub fn analysis_failed() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ANALYSIS_FAILED)
    }
}

/// Any failure inside the analysis is reported to the client as a bare 500;
/// the detail only goes to the log.
impl From<BalanceWheelError> for WebError {
    fn from(err: BalanceWheelError) -> Self {
        warn!(error = %err, upstream = err.is_upstream(), "analysis failed");
        Self::analysis_failed()
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
