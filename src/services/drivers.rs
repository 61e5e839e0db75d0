use std::sync::Arc;

use crate::error::AppError;
use crate::models::driver::{Driver, DriverUpdate, NewDriver};
use crate::repository::DriverRepository;

/// Thin CRUD wrapper over the driver store.
#[derive(Clone)]
pub struct DriverService {
    repo: Arc<dyn DriverRepository>,
}

impl DriverService {
    pub fn new(repo: Arc<dyn DriverRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, new: NewDriver) -> Result<Driver, AppError> {
        self.repo.create(new).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<Driver>, AppError> {
        self.repo.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Driver>, AppError> {
        self.repo.list().await
    }

    pub async fn update(&self, id: i32, update: DriverUpdate) -> Result<Option<Driver>, AppError> {
        self.repo.update(id, update).await
    }

    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        self.repo.delete(id).await
    }
}
