use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub specialization: String,
    pub license_number: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub avatar_url: Option<String>,
    pub status: String,
    pub is_deleted: bool,
    pub created_by: Option<String>,
    pub created_by_model: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub updated_by_model: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Denormalized summary attached to appointment/prescription reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub specialization: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub department: String,
    pub specialization: String,
    pub license_number: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub avatar_url: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DoctorListQuery {
    pub search: Option<String>,
    pub department: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub const DOCTOR_STATUSES: &[&str] = &["active", "inactive"];
