use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub license_number: String,
    pub license_expiry_date: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Driver fields as supplied by a caller; the store assigns the id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDriver {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub license_number: String,
    pub license_expiry_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub license_number: String,
    pub license_expiry_date: DateTime<Utc>,
    pub is_active: bool,
}

/// Trimmed driver shape embedded in assignment views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub license_number: String,
    pub license_expiry_date: DateTime<Utc>,
}

impl From<&Driver> for DriverSummary {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id,
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            email: driver.email.clone(),
            phone_number: driver.phone_number.clone(),
            license_number: driver.license_number.clone(),
            license_expiry_date: driver.license_expiry_date,
        }
    }
}
