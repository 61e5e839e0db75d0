use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Assigned,
    InTransit,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub amount: f64,
    pub estimated_delivery_time: String,
    /// Denormalized from the active assignment; maintained by the
    /// assignment service.
    pub assigned_driver_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Job fields as supplied by a caller; an id is generated when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJob {
    pub id: Option<String>,
    pub title: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub priority: JobPriority,
    pub amount: f64,
    pub estimated_delivery_time: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobUpdate {
    pub title: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub amount: f64,
    pub estimated_delivery_time: String,
    pub assigned_driver_id: Option<i32>,
}

/// Trimmed job shape embedded in assignment views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub amount: f64,
    pub estimated_delivery_time: String,
}

impl From<&Job> for JobSummary {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            pickup_address: job.pickup_address.clone(),
            dropoff_address: job.dropoff_address.clone(),
            status: job.status,
            priority: job.priority,
            amount: job.amount,
            estimated_delivery_time: job.estimated_delivery_time.clone(),
        }
    }
}
