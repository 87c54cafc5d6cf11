use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use doctor_cell::models::DoctorSummary;
use patient_cell::models::PatientSummary;

/// Default `details` text when the originating diagnosis is blank.
pub const PLACEHOLDER_DETAILS: &str = "No diagnosis recorded";
/// Default `notes` text when the originating advice is blank.
pub const PLACEHOLDER_NOTES: &str = "No additional notes";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: String,
    pub patient_id: String,
    pub appointment_id: String,
    pub prescription_id: String,
    pub details: String,
    pub notes: String,
    pub status: String,
    pub is_deleted: bool,
    pub created_by: Option<String>,
    pub created_by_model: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    pub updated_by_model: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Free-standing consultation note attached to a patient's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub appointment_id: Option<String>,
    pub notes: Option<String>,
    pub consulted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

/// Input for the record created alongside a prescription.
#[derive(Debug, Clone)]
pub struct NewMedicalRecord {
    pub patient_id: String,
    pub appointment_id: String,
    pub prescription_id: String,
    pub details: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecordListQuery {
    pub patient_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Denormalized report document handed to the external PDF renderer.
#[derive(Debug, Serialize)]
pub struct ReportDocument {
    pub record: MedicalRecord,
    pub patient: Option<PatientSummary>,
    pub doctor: Option<DoctorSummary>,
    pub prescription: Option<Value>,
    pub consultations: Vec<Consultation>,
    pub generated_at: DateTime<Utc>,
}
