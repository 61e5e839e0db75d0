use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::job::{Job, JobStatus, JobUpdate, NewJob};
use crate::repository::JobRepository;

/// Thin CRUD wrapper over the job store.
#[derive(Clone)]
pub struct JobService {
    repo: Arc<dyn JobRepository>,
}

impl JobService {
    pub fn new(repo: Arc<dyn JobRepository>) -> Self {
        Self { repo }
    }

    /// Creates a job, generating an id when the caller supplied none.
    pub async fn create(&self, new: NewJob) -> Result<Job, AppError> {
        let id = new
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let job = Job {
            id,
            title: new.title,
            pickup_address: new.pickup_address,
            dropoff_address: new.dropoff_address,
            status: JobStatus::Pending,
            priority: new.priority,
            amount: new.amount,
            estimated_delivery_time: new.estimated_delivery_time,
            assigned_driver_id: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        self.repo.create(job).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Job>, AppError> {
        self.repo.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<Job>, AppError> {
        self.repo.list().await
    }

    pub async fn update(&self, id: &str, update: JobUpdate) -> Result<Option<Job>, AppError> {
        self.repo.update(id, update).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        self.repo.delete(id).await
    }
}
