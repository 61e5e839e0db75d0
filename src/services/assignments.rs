use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::AppError;
use crate::models::assignment::{AssignmentStatus, AssignmentView, JobAssignment};
use crate::models::job::{Job, JobStatus, JobUpdate};
use crate::observability::metrics::Metrics;
use crate::repository::{AssignmentRepository, DriverRepository, JobRepository};

/// Orchestrates the dispatch workflow: validates inputs, checks that the job
/// and driver exist, and creates the assignment while upholding the
/// at-most-one-active-assignment-per-job invariant.
///
/// The pre-insert scan over existing assignments is only a fast path for a
/// friendly error; the guarantee itself lives in the store's `insert_active`,
/// which stays correct when two dispatch requests race for the same job.
#[derive(Clone)]
pub struct AssignmentService {
    assignments: Arc<dyn AssignmentRepository>,
    jobs: Arc<dyn JobRepository>,
    drivers: Arc<dyn DriverRepository>,
    metrics: Metrics,
}

impl AssignmentService {
    pub fn new(
        assignments: Arc<dyn AssignmentRepository>,
        jobs: Arc<dyn JobRepository>,
        drivers: Arc<dyn DriverRepository>,
        metrics: Metrics,
    ) -> Self {
        Self {
            assignments,
            jobs,
            drivers,
            metrics,
        }
    }

    pub async fn assign_job(
        &self,
        job_id: &str,
        driver_id: i32,
    ) -> Result<AssignmentView, AppError> {
        let start = Instant::now();
        let result = self.dispatch(job_id, driver_id).await;

        let outcome = match &result {
            Ok(_) => "assigned",
            Err(AppError::Conflict(_)) => "conflict",
            Err(AppError::BadRequest(_)) | Err(AppError::NotFound(_)) => "rejected",
            Err(_) => "error",
        };

        let elapsed = start.elapsed().as_secs_f64();
        self.metrics
            .dispatch_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed);
        self.metrics
            .dispatch_total
            .with_label_values(&[outcome])
            .inc();

        match &result {
            Ok(view) => {
                self.metrics.active_assignments.inc();
                info!(
                    job_id = %view.assignment.job_id,
                    driver_id = view.assignment.driver_id,
                    assignment_id = %view.assignment.id,
                    "job assigned"
                );
            }
            Err(err) => {
                warn!(job_id, driver_id, error = %err, "dispatch failed");
            }
        }

        result
    }

    async fn dispatch(&self, job_id: &str, driver_id: i32) -> Result<AssignmentView, AppError> {
        validate_job_id(job_id)?;
        validate_driver_id(driver_id)?;

        let job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

        let driver = self
            .drivers
            .get(driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

        let existing = self.assignments.list_by_job(job_id).await?;
        if let Some(active) = existing
            .iter()
            .find(|a| a.status == AssignmentStatus::Active)
        {
            return Err(AppError::Conflict(format!(
                "job {job_id} is already assigned to driver {}",
                active.driver_id
            )));
        }

        // The store rejects a concurrent duplicate here with the same
        // Conflict taxonomy, so a lost race never surfaces as a 500.
        let assignment = self.assignments.insert_active(job_id, driver_id).await?;

        let updated_job = self
            .jobs
            .update(job_id, denormalized(&job, JobStatus::Assigned, Some(driver_id)))
            .await?;

        Ok(AssignmentView {
            assignment,
            driver: Some((&driver).into()),
            job: updated_job.as_ref().or(Some(&job)).map(Into::into),
        })
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: AssignmentStatus,
    ) -> Result<AssignmentView, AppError> {
        validate_assignment_id(id)?;

        let current = self
            .assignments
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("assignment {id} not found")))?;

        // Same-status updates are idempotent; reverse transitions are not a
        // thing an assignment does.
        if current.status == status {
            return self.hydrate(current).await;
        }

        match (current.status, status) {
            (AssignmentStatus::Active, AssignmentStatus::Completed) => {}
            (from, to) => {
                return Err(AppError::BadRequest(format!(
                    "assignment {id} cannot transition from {from:?} to {to:?}"
                )));
            }
        }

        let updated = self
            .assignments
            .set_status(id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("assignment {id} not found")))?;

        self.metrics.active_assignments.dec();
        info!(assignment_id = %id, job_id = %updated.job_id, "assignment completed");

        self.hydrate(updated).await
    }

    pub async fn unassign_job(&self, id: &str) -> Result<bool, AppError> {
        validate_assignment_id(id)?;

        let Some(removed) = self.assignments.delete(id).await? else {
            return Ok(false);
        };

        if removed.status == AssignmentStatus::Active {
            self.metrics.active_assignments.dec();

            // The job no longer has an active binding; reset its
            // denormalized fields.
            if let Some(job) = self.jobs.get(&removed.job_id).await? {
                self.jobs
                    .update(&job.id, denormalized(&job, JobStatus::Pending, None))
                    .await?;
            }
        }

        info!(assignment_id = %id, job_id = %removed.job_id, "assignment removed");
        Ok(true)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<AssignmentView>, AppError> {
        validate_assignment_id(id)?;

        match self.assignments.get(id).await? {
            Some(assignment) => Ok(Some(self.hydrate(assignment).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<AssignmentView>, AppError> {
        self.hydrate_all(self.assignments.list().await?).await
    }

    pub async fn list_by_driver(&self, driver_id: i32) -> Result<Vec<AssignmentView>, AppError> {
        validate_driver_id(driver_id)?;
        self.hydrate_all(self.assignments.list_by_driver(driver_id).await?)
            .await
    }

    pub async fn list_by_job(&self, job_id: &str) -> Result<Vec<AssignmentView>, AppError> {
        validate_job_id(job_id)?;
        self.hydrate_all(self.assignments.list_by_job(job_id).await?)
            .await
    }

    pub async fn list_active(&self) -> Result<Vec<AssignmentView>, AppError> {
        self.hydrate_all(self.assignments.list_active().await?)
            .await
    }

    async fn hydrate(&self, assignment: JobAssignment) -> Result<AssignmentView, AppError> {
        let driver = self.drivers.get(assignment.driver_id).await?;
        let job = self.jobs.get(&assignment.job_id).await?;

        Ok(AssignmentView {
            driver: driver.as_ref().map(Into::into),
            job: job.as_ref().map(Into::into),
            assignment,
        })
    }

    async fn hydrate_all(
        &self,
        assignments: Vec<JobAssignment>,
    ) -> Result<Vec<AssignmentView>, AppError> {
        let mut views = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            views.push(self.hydrate(assignment).await?);
        }
        Ok(views)
    }
}

fn validate_job_id(job_id: &str) -> Result<(), AppError> {
    if job_id.trim().is_empty() {
        return Err(AppError::BadRequest("job id cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_driver_id(driver_id: i32) -> Result<(), AppError> {
    if driver_id <= 0 {
        return Err(AppError::BadRequest(
            "driver id must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_assignment_id(id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "assignment id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn denormalized(job: &Job, status: JobStatus, assigned_driver_id: Option<i32>) -> JobUpdate {
    JobUpdate {
        title: job.title.clone(),
        pickup_address: job.pickup_address.clone(),
        dropoff_address: job.dropoff_address.clone(),
        status,
        priority: job.priority,
        amount: job.amount,
        estimated_delivery_time: job.estimated_delivery_time.clone(),
        assigned_driver_id,
    }
}
