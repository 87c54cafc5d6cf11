use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Appointment states in which a prescription may be written.
pub const PRESCRIBABLE_STATUSES: [&str; 2] = ["completed", "confirmed"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicineItem {
    pub name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub appointment_id: String,
    pub doctor_id: String,
    pub patient_id: String,
    pub medicines: Vec<MedicineItem>,
    pub diagnosis: Option<String>,
    pub advice: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub is_deleted: bool,
    pub created_by: Option<String>,
    pub created_by_model: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub updated_by_model: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub appointment_id: String,
    pub medicines: Vec<MedicineItem>,
    pub diagnosis: Option<String>,
    pub advice: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PrescriptionListQuery {
    pub patient_id: Option<String>,
    pub appointment_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
