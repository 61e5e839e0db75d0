use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::Utc;

use crate::error::AppError;
use crate::models::driver::{Driver, DriverUpdate, NewDriver};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/drivers", get(list_drivers).post(create_driver))
        .route(
            "/drivers/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
}

async fn create_driver(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewDriver>,
) -> Result<(StatusCode, Json<Driver>), AppError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if !payload.email.contains('@') {
        return Err(AppError::BadRequest(
            "email must be a valid address".to_string(),
        ));
    }

    if payload.license_number.trim().is_empty() {
        return Err(AppError::BadRequest(
            "license number cannot be empty".to_string(),
        ));
    }

    if payload.license_expiry_date <= Utc::now() {
        return Err(AppError::BadRequest(
            "license expiry date must be in the future".to_string(),
        ));
    }

    let driver = state.drivers.create(payload).await?;
    Ok((StatusCode::CREATED, Json(driver)))
}

async fn get_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Driver>, AppError> {
    let driver = state
        .drivers
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    Ok(Json(driver))
}

async fn list_drivers(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Driver>>, AppError> {
    Ok(Json(state.drivers.list().await?))
}

async fn update_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<DriverUpdate>,
) -> Result<Json<Driver>, AppError> {
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    let driver = state
        .drivers
        .update(id, payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("driver {id} not found")))?;

    Ok(Json(driver))
}

async fn delete_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.drivers.delete(id).await? {
        return Err(AppError::NotFound(format!("driver {id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}
