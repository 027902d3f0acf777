//! HTTP handlers.

pub mod health;
pub mod optimize;
pub mod plan;

use axum::http::StatusCode;
use craftplan_core::CraftplanError;

/// Map a planner error onto a status code and message.
pub fn error_response(err: CraftplanError) -> (StatusCode, String) {
    let status = match &err {
        CraftplanError::UnknownItem { .. } => StatusCode::NOT_FOUND,
        _ if err.is_client_error() => StatusCode::BAD_REQUEST,
        CraftplanError::DataUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
