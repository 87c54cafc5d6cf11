use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::error::StoreError;
use shared_database::store::DocumentStore;
use shared_models::actor::{capability, Actor, Role};
use shared_models::error::AppError;
use shared_utils::audit;
use shared_utils::store::map_store_error;
use shared_utils::validate;

use crate::models::{
    CreatePrescriptionRequest, Prescription, PrescriptionListQuery, PRESCRIBABLE_STATUSES,
};
use crate::services::cascade::RecordCascade;

/// Slice of the appointment row needed to authorize a prescription.
#[derive(Debug, Deserialize)]
struct PrescribedAppointment {
    id: String,
    patient_id: String,
    doctor_id: String,
    status: String,
}

pub struct PrescribingService {
    store: Arc<DocumentStore>,
    cascade: RecordCascade,
}

impl PrescribingService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        let cascade = RecordCascade::new(Arc::clone(&store));
        Self { store, cascade }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreatePrescriptionRequest,
        auth_token: &str,
    ) -> Result<Prescription, AppError> {
        actor.require(capability::CREATE_PRESCRIPTION)?;

        validate::require_str("appointment_id", &request.appointment_id)?;
        if request.medicines.is_empty() {
            return Err(AppError::Validation {
                field: "medicines".to_string(),
                reason: "at least one medicine is required".to_string(),
            });
        }
        for medicine in &request.medicines {
            validate::require_str("medicines.name", &medicine.name)?;
            validate::require_str("medicines.dosage", &medicine.dosage)?;
        }

        let appointment = self
            .load_appointment(actor, &request.appointment_id, auth_token)
            .await?;

        if !PRESCRIBABLE_STATUSES.contains(&appointment.status.as_str()) {
            return Err(AppError::Validation {
                field: "appointment_id".to_string(),
                reason: format!(
                    "prescriptions require a confirmed or completed appointment, found {}",
                    appointment.status
                ),
            });
        }

        self.reject_duplicate(&appointment.id, auth_token).await?;

        let mut body = json!({
            "id": Uuid::new_v4().to_string(),
            "appointment_id": appointment.id,
            "doctor_id": appointment.doctor_id,
            "patient_id": appointment.patient_id,
            "medicines": request.medicines,
            "diagnosis": request.diagnosis,
            "advice": request.advice,
            "follow_up_date": request.follow_up_date,
            "is_deleted": false,
        });
        audit::apply_stamp(&mut body, audit::creation_stamp(actor));

        let prescription: Prescription = self
            .store
            .insert("prescriptions", body, Some(auth_token))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::Conflict(
                    "A prescription already exists for this appointment".to_string(),
                ),
                other => map_store_error(other),
            })?;

        info!(
            "Prescription {} written for appointment {}",
            prescription.id, prescription.appointment_id
        );

        // Best-effort fan-out; the prescription stands either way.
        self.cascade.run(actor, &prescription, auth_token).await;

        Ok(prescription)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        query: &PrescriptionListQuery,
        auth_token: &str,
    ) -> Result<Vec<Prescription>, AppError> {
        actor.require(capability::VIEW_PRESCRIPTIONS)?;

        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut filters = vec![
            "is_deleted=eq.false".to_string(),
            "order=created_at.desc".to_string(),
            format!("limit={}", limit),
            format!("offset={}", offset),
        ];

        // Doctors only see what they prescribed.
        if actor.role == Role::Doctor {
            filters.push(format!("doctor_id=eq.{}", actor.id));
        }
        if let Some(patient_id) = &query.patient_id {
            filters.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(appointment_id) = &query.appointment_id {
            filters.push(format!("appointment_id=eq.{}", appointment_id));
        }

        self.store
            .find("prescriptions", &filters, Some(auth_token))
            .await
            .map_err(map_store_error)
    }

    /// Doctors may only prescribe against their own appointments; the
    /// ownership filter is folded into the lookup.
    async fn load_appointment(
        &self,
        actor: &Actor,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<PrescribedAppointment, AppError> {
        debug!("Loading appointment {} for prescription", appointment_id);

        let mut filters = vec![
            format!("id=eq.{}", appointment_id),
            "is_deleted=eq.false".to_string(),
            "select=id,patient_id,doctor_id,status".to_string(),
        ];
        if actor.role == Role::Doctor {
            filters.push(format!("doctor_id=eq.{}", actor.id));
        }

        let appointment: Option<PrescribedAppointment> = self
            .store
            .find_one("appointments", &filters, Some(auth_token))
            .await
            .map_err(map_store_error)?;

        appointment.ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))
    }

    async fn reject_duplicate(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<(), AppError> {
        let existing: Option<serde_json::Value> = self
            .store
            .find_one(
                "prescriptions",
                &[
                    format!("appointment_id=eq.{}", appointment_id),
                    "is_deleted=eq.false".to_string(),
                    "select=id".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "A prescription already exists for this appointment".to_string(),
            ));
        }
        Ok(())
    }
}
