//! Plan API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use craftplan_planner::{PlanOutcome, PlanRequest};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use super::error_response;
use crate::state::AppState;

/// Short listing entry for a stored plan.
#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub item: String,
    pub count: u32,
    pub version: String,
    pub steps: usize,
    pub obtainable: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&PlanOutcome> for PlanSummary {
    fn from(plan: &PlanOutcome) -> Self {
        Self {
            id: plan.id,
            item: plan.item.clone(),
            count: plan.count,
            version: plan.version.clone(),
            steps: plan.path.len(),
            obtainable: !plan.is_unobtainable(),
            created_at: plan.created_at,
        }
    }
}

/// Registered data versions.
#[derive(Debug, Serialize)]
pub struct VersionsResponse {
    pub default: Option<String>,
    pub versions: Vec<String>,
}

/// Build a plan for the requested item.
pub async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<(StatusCode, Json<PlanOutcome>), (StatusCode, String)> {
    let planner = state.planner.clone();
    let outcome = tokio::task::spawn_blocking(move || planner.plan_blocking(&req))
        .await
        .map_err(|e| {
            error!("Planning task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .map_err(|e| {
            warn!("Plan request rejected: {}", e);
            error_response(e)
        })?;

    state.store_plan(outcome.clone()).await;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Get a plan by ID.
pub async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanOutcome>, (StatusCode, String)> {
    let plan = state
        .get_plan(id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Plan {} not found", id)))?;

    Ok(Json(plan))
}

/// Delete a plan.
pub async fn delete_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .remove_plan(id)
        .await
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Plan {} not found", id)))?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all plans.
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<PlanSummary>> {
    let plans = state.list_plans().await;
    Json(plans.iter().map(PlanSummary::from).collect())
}

/// List registered data versions.
pub async fn list_versions(State(state): State<AppState>) -> Json<VersionsResponse> {
    Json(VersionsResponse {
        default: state.registry.default_version().map(str::to_string),
        versions: state.registry.versions(),
    })
}
