use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use doctor_cell::models::DoctorSummary;
use patient_cell::models::PatientSummary;
use shared_database::store::DocumentStore;
use shared_models::error::AppError;
use shared_utils::store::map_store_error;

use crate::models::{Consultation, ReportDocument};
use crate::services::records::MedicalRecordService;

/// Assembles the denormalized report document for one medical record.
/// PDF rasterization is an external collaborator; this service only
/// gathers the data it consumes.
pub struct ReportAssemblyService {
    store: Arc<DocumentStore>,
    records: MedicalRecordService,
}

impl ReportAssemblyService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        let records = MedicalRecordService::new(Arc::clone(&store));
        Self { store, records }
    }

    pub async fn assemble(
        &self,
        record_id: &str,
        auth_token: &str,
    ) -> Result<ReportDocument, AppError> {
        debug!("Assembling report for medical record {}", record_id);

        let record = self
            .records
            .get(record_id, auth_token)
            .await?
            .ok_or_else(|| AppError::NotFound("Medical record not found".to_string()))?;

        let prescription: Option<Value> = self
            .store
            .find_one(
                "prescriptions",
                &[
                    format!("id=eq.{}", record.prescription_id),
                    "is_deleted=eq.false".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        let patient: Option<PatientSummary> = self
            .store
            .find_one(
                "patients",
                &[
                    format!("id=eq.{}", record.patient_id),
                    "select=id,name,email,phone".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        // The record itself carries no doctor reference; take it from the
        // prescription when one exists.
        let doctor: Option<DoctorSummary> = match prescription
            .as_ref()
            .and_then(|p| p.get("doctor_id"))
            .and_then(Value::as_str)
        {
            Some(doctor_id) => self
                .store
                .find_one(
                    "doctors",
                    &[
                        format!("id=eq.{}", doctor_id),
                        "select=id,name,email,department,specialization".to_string(),
                    ],
                    Some(auth_token),
                )
                .await
                .map_err(map_store_error)?,
            None => None,
        };

        let consultations: Vec<Consultation> = self
            .store
            .find(
                "consultations",
                &[
                    format!("patient_id=eq.{}", record.patient_id),
                    "is_deleted=eq.false".to_string(),
                    "order=consulted_at.desc".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        Ok(ReportDocument {
            record,
            patient,
            doctor,
            prescription,
            consultations,
            generated_at: Utc::now(),
        })
    }
}
