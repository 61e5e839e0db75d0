use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::assignment::{AssignmentStatus, AssignmentView};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/jobassignments",
            get(list_assignments).post(assign_job),
        )
        .route("/jobassignments/active", get(list_active))
        .route("/jobassignments/driver/:driver_id", get(list_by_driver))
        .route("/jobassignments/job/:job_id", get(list_by_job))
        .route(
            "/jobassignments/:id",
            get(get_assignment).delete(unassign_job),
        )
        .route("/jobassignments/:id/status", put(update_status))
}

#[derive(Deserialize)]
pub struct AssignJobRequest {
    pub job_id: String,
    pub driver_id: i32,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AssignmentStatus,
}

async fn assign_job(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssignJobRequest>,
) -> Result<(StatusCode, Json<AssignmentView>), AppError> {
    let view = state
        .assignments
        .assign_job(&payload.job_id, payload.driver_id)
        .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AssignmentView>, AppError> {
    let view = state
        .assignments
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("assignment {id} not found")))?;

    Ok(Json(view))
}

async fn list_assignments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    Ok(Json(state.assignments.list().await?))
}

async fn list_by_driver(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<i32>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    Ok(Json(state.assignments.list_by_driver(driver_id).await?))
}

async fn list_by_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    Ok(Json(state.assignments.list_by_job(&job_id).await?))
}

async fn list_active(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    Ok(Json(state.assignments.list_active().await?))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<AssignmentView>, AppError> {
    let view = state.assignments.update_status(&id, payload.status).await?;
    Ok(Json(view))
}

async fn unassign_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.assignments.unassign_job(&id).await? {
        return Err(AppError::NotFound(format!("assignment {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
