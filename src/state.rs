use std::sync::Arc;

use crate::observability::metrics::Metrics;
use crate::repository::memory::{InMemoryAssignments, InMemoryDrivers, InMemoryJobs};
use crate::repository::{AssignmentRepository, DriverRepository, JobRepository};
use crate::services::{AssignmentService, DriverService, JobService};

pub struct AppState {
    pub jobs: JobService,
    pub drivers: DriverService,
    pub assignments: AssignmentService,
    pub metrics: Metrics,
}

impl AppState {
    /// Wires the services over the in-memory stores. Swapping the store only
    /// means handing different repository implementations to the services.
    pub fn in_memory() -> Self {
        let metrics = Metrics::new();

        let job_repo: Arc<dyn JobRepository> = Arc::new(InMemoryJobs::new());
        let driver_repo: Arc<dyn DriverRepository> = Arc::new(InMemoryDrivers::new());
        let assignment_repo: Arc<dyn AssignmentRepository> = Arc::new(InMemoryAssignments::new());

        Self {
            jobs: JobService::new(job_repo.clone()),
            drivers: DriverService::new(driver_repo.clone()),
            assignments: AssignmentService::new(
                assignment_repo,
                job_repo,
                driver_repo,
                metrics.clone(),
            ),
            metrics,
        }
    }
}
