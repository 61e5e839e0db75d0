use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::error::AppError;
use crate::models::job::{Job, JobUpdate, NewJob};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:id", get(get_job).put(update_job).delete(delete_job))
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewJob>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title cannot be empty".to_string()));
    }

    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(AppError::BadRequest(
            "amount must be non-negative".to_string(),
        ));
    }

    let job = state.jobs.create(payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Job>, AppError> {
    let job = state
        .jobs
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;

    Ok(Json(job))
}

async fn list_jobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.jobs.list().await?))
}

async fn update_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<JobUpdate>,
) -> Result<Json<Job>, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::BadRequest("title cannot be empty".to_string()));
    }

    if !payload.amount.is_finite() || payload.amount < 0.0 {
        return Err(AppError::BadRequest(
            "amount must be non-negative".to_string(),
        ));
    }

    let job = state
        .jobs
        .update(&id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {id} not found")))?;

    Ok(Json(job))
}

async fn delete_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.jobs.delete(&id).await? {
        return Err(AppError::NotFound(format!("job {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
