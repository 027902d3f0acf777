//! Path optimization endpoint.

use axum::{http::StatusCode, Json};
use craftplan_core::ActionPath;
use craftplan_planner::remove_orphaned_ingredients;
use serde::{Deserialize, Serialize};

/// Request to trim a linear path.
#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub path: ActionPath,
}

/// Trimmed path.
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub path: ActionPath,
    pub steps_removed: usize,
}

/// Run orphan removal on a supplied path.
pub async fn optimize_path(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    if req.path.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Path must not be empty".to_string()));
    }

    let path = remove_orphaned_ingredients(&req.path);
    Ok(Json(OptimizeResponse {
        steps_removed: req.path.len() - path.len(),
        path,
    }))
}
