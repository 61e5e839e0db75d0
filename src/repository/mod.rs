pub mod memory;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::assignment::{AssignmentStatus, JobAssignment};
use crate::models::driver::{Driver, DriverUpdate, NewDriver};
use crate::models::job::{Job, JobUpdate};

/// Persistence contract for drivers. Implementations may be remote and may
/// fail; callers must not assume atomicity across separate calls.
#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Driver>, AppError>;
    async fn get(&self, id: i32) -> Result<Option<Driver>, AppError>;
    async fn create(&self, new: NewDriver) -> Result<Driver, AppError>;
    async fn update(&self, id: i32, update: DriverUpdate) -> Result<Option<Driver>, AppError>;
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// Persistence contract for jobs.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Job>, AppError>;
    async fn get(&self, id: &str) -> Result<Option<Job>, AppError>;
    async fn create(&self, job: Job) -> Result<Job, AppError>;
    async fn update(&self, id: &str, update: JobUpdate) -> Result<Option<Job>, AppError>;
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Persistence contract for job assignments.
///
/// `insert_active` is the store-level uniqueness point: it must fail with
/// `AppError::Conflict` when an Active assignment already exists for the job,
/// atomically with respect to concurrent inserts for the same job id.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<JobAssignment>, AppError>;
    async fn list(&self) -> Result<Vec<JobAssignment>, AppError>;
    async fn list_by_driver(&self, driver_id: i32) -> Result<Vec<JobAssignment>, AppError>;
    async fn list_by_job(&self, job_id: &str) -> Result<Vec<JobAssignment>, AppError>;
    async fn list_active(&self) -> Result<Vec<JobAssignment>, AppError>;
    async fn insert_active(&self, job_id: &str, driver_id: i32)
        -> Result<JobAssignment, AppError>;
    async fn set_status(
        &self,
        id: &str,
        status: AssignmentStatus,
    ) -> Result<Option<JobAssignment>, AppError>;
    /// Returns the removed assignment, or `None` if the id was unknown.
    async fn delete(&self, id: &str) -> Result<Option<JobAssignment>, AppError>;
}
