use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::{AssignmentStatus, JobAssignment};
use crate::models::driver::{Driver, DriverUpdate, NewDriver};
use crate::models::job::{Job, JobUpdate};
use crate::repository::{AssignmentRepository, DriverRepository, JobRepository};

pub struct InMemoryDrivers {
    rows: DashMap<i32, Driver>,
    next_id: AtomicI32,
}

impl InMemoryDrivers {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

#[async_trait]
impl DriverRepository for InMemoryDrivers {
    async fn list(&self) -> Result<Vec<Driver>, AppError> {
        Ok(self.rows.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Driver>, AppError> {
        Ok(self.rows.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, new: NewDriver) -> Result<Driver, AppError> {
        let driver = Driver {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone_number: new.phone_number,
            license_number: new.license_number,
            license_expiry_date: new.license_expiry_date,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };

        self.rows.insert(driver.id, driver.clone());
        Ok(driver)
    }

    async fn update(&self, id: i32, update: DriverUpdate) -> Result<Option<Driver>, AppError> {
        let Some(mut driver) = self.rows.get_mut(&id) else {
            return Ok(None);
        };

        driver.first_name = update.first_name;
        driver.last_name = update.last_name;
        driver.email = update.email;
        driver.phone_number = update.phone_number;
        driver.license_number = update.license_number;
        driver.license_expiry_date = update.license_expiry_date;
        driver.is_active = update.is_active;
        driver.updated_at = Some(Utc::now());

        Ok(Some(driver.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        Ok(self.rows.remove(&id).is_some())
    }
}

pub struct InMemoryJobs {
    rows: DashMap<String, Job>,
}

impl InMemoryJobs {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }
}

#[async_trait]
impl JobRepository for InMemoryJobs {
    async fn list(&self) -> Result<Vec<Job>, AppError> {
        Ok(self.rows.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Job>, AppError> {
        Ok(self.rows.get(id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, job: Job) -> Result<Job, AppError> {
        match self.rows.entry(job.id.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "job {} already exists",
                job.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(job.clone());
                Ok(job)
            }
        }
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<Option<Job>, AppError> {
        let Some(mut job) = self.rows.get_mut(id) else {
            return Ok(None);
        };

        job.title = update.title;
        job.pickup_address = update.pickup_address;
        job.dropoff_address = update.dropoff_address;
        job.status = update.status;
        job.priority = update.priority;
        job.amount = update.amount;
        job.estimated_delivery_time = update.estimated_delivery_time;
        job.assigned_driver_id = update.assigned_driver_id;
        job.updated_at = Some(Utc::now());

        Ok(Some(job.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.rows.remove(id).is_some())
    }
}

/// In-memory assignment store.
///
/// `active_by_job` plays the role of a partial unique index on
/// `(job_id) where status = Active`: inserts go through its entry API, so
/// concurrent inserts for one job serialize on the shard lock and exactly
/// one wins. Completion and deletion unlink the index entry only after the
/// row itself has left the Active state, so the at-most-one-active invariant
/// holds at every instant (a concurrent insert during that window sees a
/// spurious conflict, never a duplicate).
pub struct InMemoryAssignments {
    rows: DashMap<String, JobAssignment>,
    active_by_job: DashMap<String, String>,
}

impl InMemoryAssignments {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            active_by_job: DashMap::new(),
        }
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignments {
    async fn get(&self, id: &str) -> Result<Option<JobAssignment>, AppError> {
        Ok(self.rows.get(id).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<JobAssignment>, AppError> {
        Ok(self.rows.iter().map(|entry| entry.value().clone()).collect())
    }

    async fn list_by_driver(&self, driver_id: i32) -> Result<Vec<JobAssignment>, AppError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.value().driver_id == driver_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn list_by_job(&self, job_id: &str) -> Result<Vec<JobAssignment>, AppError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.value().job_id == job_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<JobAssignment>, AppError> {
        Ok(self
            .rows
            .iter()
            .filter(|entry| entry.value().status == AssignmentStatus::Active)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_active(
        &self,
        job_id: &str,
        driver_id: i32,
    ) -> Result<JobAssignment, AppError> {
        match self.active_by_job.entry(job_id.to_string()) {
            Entry::Occupied(incumbent) => {
                let message = match self.rows.get(incumbent.get()) {
                    Some(existing) => format!(
                        "job {} is already assigned to driver {}",
                        job_id,
                        existing.driver_id
                    ),
                    None => format!("job {job_id} already has an active assignment"),
                };
                Err(AppError::Conflict(message))
            }
            Entry::Vacant(slot) => {
                let assignment = JobAssignment {
                    id: Uuid::new_v4().to_string(),
                    job_id: job_id.to_string(),
                    driver_id,
                    assigned_at: Utc::now(),
                    status: AssignmentStatus::Active,
                    updated_at: None,
                };

                slot.insert(assignment.id.clone());
                self.rows.insert(assignment.id.clone(), assignment.clone());
                Ok(assignment)
            }
        }
    }

    async fn set_status(
        &self,
        id: &str,
        status: AssignmentStatus,
    ) -> Result<Option<JobAssignment>, AppError> {
        let (job_id, updated) = {
            let Some(mut row) = self.rows.get_mut(id) else {
                return Ok(None);
            };

            if row.status == status {
                return Ok(Some(row.clone()));
            }

            row.status = status;
            row.updated_at = Some(Utc::now());
            (row.job_id.clone(), row.clone())
        };

        // Unlink after the row has left the Active state; see type docs.
        if status == AssignmentStatus::Completed {
            self.active_by_job.remove_if(&job_id, |_, active_id| active_id == id);
        }

        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<Option<JobAssignment>, AppError> {
        let Some((_, removed)) = self.rows.remove(id) else {
            return Ok(None);
        };

        if removed.status == AssignmentStatus::Active {
            self.active_by_job
                .remove_if(&removed.job_id, |_, active_id| active_id == id);
        }

        Ok(Some(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_active_rejects_second_active_for_same_job() {
        let repo = InMemoryAssignments::new();

        let first = repo.insert_active("job-1", 42).await.unwrap();
        assert_eq!(first.status, AssignmentStatus::Active);

        let err = repo.insert_active("job-1", 7).await.unwrap_err();
        match err {
            AppError::Conflict(message) => assert!(message.contains("42")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn completing_frees_the_job_for_reassignment() {
        let repo = InMemoryAssignments::new();

        let first = repo.insert_active("job-1", 42).await.unwrap();
        repo.set_status(&first.id, AssignmentStatus::Completed)
            .await
            .unwrap();

        let second = repo.insert_active("job-1", 7).await.unwrap();
        assert_eq!(second.driver_id, 7);

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);
    }

    #[tokio::test]
    async fn deleting_an_active_assignment_frees_the_job() {
        let repo = InMemoryAssignments::new();

        let first = repo.insert_active("job-1", 42).await.unwrap();
        let removed = repo.delete(&first.id).await.unwrap().unwrap();
        assert_eq!(removed.id, first.id);

        repo.insert_active("job-1", 7).await.unwrap();
    }

    #[tokio::test]
    async fn delete_unknown_returns_none() {
        let repo = InMemoryAssignments::new();
        assert!(repo.delete("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_status_is_idempotent_for_same_status() {
        let repo = InMemoryAssignments::new();

        let assignment = repo.insert_active("job-1", 42).await.unwrap();
        let unchanged = repo
            .set_status(&assignment.id, AssignmentStatus::Active)
            .await
            .unwrap()
            .unwrap();

        assert!(unchanged.updated_at.is_none());
    }

    #[tokio::test]
    async fn driver_ids_are_sequential() {
        let repo = InMemoryDrivers::new();

        let new = |email: &str| NewDriver {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: email.to_string(),
            phone_number: "555-0100".to_string(),
            license_number: "CDL-1".to_string(),
            license_expiry_date: Utc::now(),
        };

        let first = repo.create(new("a@example.com")).await.unwrap();
        let second = repo.create(new("b@example.com")).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn duplicate_job_id_is_a_conflict() {
        let repo = InMemoryJobs::new();

        let job = Job {
            id: "job-1".to_string(),
            title: "Pallet run".to_string(),
            pickup_address: "1 Dock St".to_string(),
            dropoff_address: "9 Bay Rd".to_string(),
            status: crate::models::job::JobStatus::Pending,
            priority: crate::models::job::JobPriority::Medium,
            amount: 250.0,
            estimated_delivery_time: "2h".to_string(),
            assigned_driver_id: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        repo.create(job.clone()).await.unwrap();
        assert!(matches!(
            repo.create(job).await,
            Err(AppError::Conflict(_))
        ));
    }
}
