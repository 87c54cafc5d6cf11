use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::store::DocumentStore;
use shared_models::actor::Actor;
use shared_models::error::AppError;
use shared_utils::audit;
use shared_utils::store::map_store_error;

use crate::models::{
    MedicalRecord, NewMedicalRecord, RecordListQuery, PLACEHOLDER_DETAILS, PLACEHOLDER_NOTES,
};

fn text_or(value: Option<String>, placeholder: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => placeholder.to_string(),
    }
}

pub struct MedicalRecordService {
    store: Arc<DocumentStore>,
}

impl MedicalRecordService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist the record that accompanies a new prescription. Blank
    /// diagnosis/advice text is replaced with fixed placeholders.
    pub async fn create(
        &self,
        actor: &Actor,
        input: NewMedicalRecord,
        auth_token: &str,
    ) -> Result<MedicalRecord, AppError> {
        let mut body = json!({
            "id": Uuid::new_v4().to_string(),
            "patient_id": input.patient_id,
            "appointment_id": input.appointment_id,
            "prescription_id": input.prescription_id,
            "details": text_or(input.details, PLACEHOLDER_DETAILS),
            "notes": text_or(input.notes, PLACEHOLDER_NOTES),
            "status": "active",
            "is_deleted": false,
        });
        audit::apply_stamp(&mut body, audit::creation_stamp(actor));

        let record: MedicalRecord = self
            .store
            .insert("medical_records", body, Some(auth_token))
            .await
            .map_err(map_store_error)?;

        info!(
            "Medical record {} created for prescription {}",
            record.id, record.prescription_id
        );

        Ok(record)
    }

    pub async fn get(
        &self,
        record_id: &str,
        auth_token: &str,
    ) -> Result<Option<MedicalRecord>, AppError> {
        debug!("Loading medical record {}", record_id);

        self.store
            .find_one(
                "medical_records",
                &[
                    format!("id=eq.{}", record_id),
                    "is_deleted=eq.false".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)
    }

    pub async fn list(
        &self,
        query: &RecordListQuery,
        auth_token: &str,
    ) -> Result<Vec<MedicalRecord>, AppError> {
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut filters = vec![
            "is_deleted=eq.false".to_string(),
            "order=created_at.desc".to_string(),
            format!("limit={}", limit),
            format!("offset={}", offset),
        ];

        if let Some(patient_id) = &query.patient_id {
            filters.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(status) = &query.status {
            filters.push(format!("status=eq.{}", status));
        }

        self.store
            .find("medical_records", &filters, Some(auth_token))
            .await
            .map_err(map_store_error)
    }
}
