use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::driver::DriverSummary;
use crate::models::job::JobSummary;

/// One-way state machine: assignments start Active and end Completed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssignmentStatus {
    Active,
    Completed,
}

/// Binding of a job to a driver. At most one Active assignment may exist
/// per job id; the store enforces this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAssignment {
    pub id: String,
    pub job_id: String,
    pub driver_id: i32,
    pub assigned_at: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Assignment plus joined driver/job summaries for client convenience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: JobAssignment,
    pub driver: Option<DriverSummary>,
    pub job: Option<JobSummary>,
}
