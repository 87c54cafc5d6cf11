use std::sync::Arc;

use chrono::Local;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::models::DoctorSummary;
use patient_cell::models::PatientSummary;
use shared_config::AppConfig;
use shared_database::error::StoreError;
use shared_database::store::DocumentStore;
use shared_models::actor::{capability, Actor, Role};
use shared_models::error::AppError;
use shared_utils::audit;
use shared_utils::store::map_store_error;
use shared_utils::validate;

use crate::models::{
    Appointment, AppointmentDetails, AppointmentError, AppointmentListQuery, AppointmentStatus,
    CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::services::conflict::SlotConflictService;
use crate::services::lifecycle::AppointmentLifecycleService;

/// Orchestrates appointment mutations: validate, authorize, past-date check,
/// conflict pre-check, audit stamp, persist, denormalize.
pub struct AppointmentSchedulingService {
    store: Arc<DocumentStore>,
    conflict_service: SlotConflictService,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentSchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        let store = Arc::new(DocumentStore::new(config));
        let conflict_service = SlotConflictService::new(Arc::clone(&store));
        let lifecycle_service = AppointmentLifecycleService::new();

        Self {
            store,
            conflict_service,
            lifecycle_service,
        }
    }

    pub async fn create_appointment(
        &self,
        actor: &Actor,
        request: CreateAppointmentRequest,
        auth_token: &str,
    ) -> Result<AppointmentDetails, AppError> {
        actor.require(capability::CREATE_APPOINTMENTS)?;

        validate::require_str("patient_id", &request.patient_id)?;
        validate::require_str("doctor_id", &request.doctor_id)?;
        validate::validate_time_slot("time_slot", &request.time_slot)?;

        let status = request.status.unwrap_or(AppointmentStatus::Scheduled);
        self.lifecycle_service
            .validate_initial_status(&status)
            .map_err(map_appointment_error)?;

        self.lifecycle_service
            .ensure_schedulable_date(request.date, Local::now().date_naive())
            .map_err(map_appointment_error)?;

        self.verify_patient_exists(&request.patient_id, auth_token).await?;
        self.verify_doctor_exists(&request.doctor_id, auth_token).await?;

        // Friendly pre-check; the store's unique index is the real guard.
        if self
            .conflict_service
            .has_conflict(
                &request.doctor_id,
                request.date,
                &request.time_slot,
                None,
                auth_token,
            )
            .await
            .map_err(map_appointment_error)?
        {
            return Err(map_appointment_error(AppointmentError::SlotTaken));
        }

        let mut body = json!({
            "id": Uuid::new_v4().to_string(),
            "patient_id": request.patient_id,
            "doctor_id": request.doctor_id,
            "date": request.date,
            "time_slot": request.time_slot,
            "status": status,
            "reason": request.reason,
            "notes": request.notes,
            "is_deleted": false,
        });
        audit::apply_stamp(&mut body, audit::creation_stamp(actor));

        let appointment: Appointment = self
            .store
            .insert("appointments", body, Some(auth_token))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => map_appointment_error(AppointmentError::SlotTaken),
                other => map_store_error(other),
            })?;

        info!(
            "Appointment {} created for doctor {} on {} at {}",
            appointment.id, appointment.doctor_id, appointment.date, appointment.time_slot
        );

        self.load_details(appointment, auth_token).await
    }

    pub async fn update_appointment(
        &self,
        actor: &Actor,
        appointment_id: &str,
        request: UpdateAppointmentRequest,
        auth_token: &str,
    ) -> Result<AppointmentDetails, AppError> {
        actor.require(capability::UPDATE_APPOINTMENTS)?;

        let existing = self
            .load_for_actor(actor, appointment_id, auth_token)
            .await?;

        let mut patch = json!({});

        if let Some(time_slot) = &request.time_slot {
            validate::validate_time_slot("time_slot", time_slot)?;
            patch["time_slot"] = json!(time_slot);
        }
        if let Some(status) = &request.status {
            self.lifecycle_service
                .validate_status_transition(&existing.status, status)
                .map_err(map_appointment_error)?;
            patch["status"] = json!(status);
        }
        if let Some(reason) = &request.reason {
            validate::require_str("reason", reason)?;
            patch["reason"] = json!(reason);
        }
        if let Some(notes) = &request.notes {
            patch["notes"] = json!(notes);
        }
        if let Some(date) = &request.date {
            patch["date"] = json!(date);
        }

        // Rescheduling: re-run the past-date rule and the conflict pre-check
        // against the effective (date, slot) pair.
        if request.date.is_some() || request.time_slot.is_some() {
            let new_date = request.date.unwrap_or(existing.date);
            let new_slot = request
                .time_slot
                .clone()
                .unwrap_or_else(|| existing.time_slot.clone());

            self.lifecycle_service
                .ensure_schedulable_date(new_date, Local::now().date_naive())
                .map_err(map_appointment_error)?;

            if self
                .conflict_service
                .has_conflict(
                    &existing.doctor_id,
                    new_date,
                    &new_slot,
                    Some(appointment_id),
                    auth_token,
                )
                .await
                .map_err(map_appointment_error)?
            {
                return Err(map_appointment_error(AppointmentError::SlotTaken));
            }
        }

        audit::apply_stamp(&mut patch, audit::update_stamp(actor));

        let appointment: Appointment = self
            .store
            .update_by_id("appointments", appointment_id, patch, Some(auth_token))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => map_appointment_error(AppointmentError::SlotTaken),
                other => map_store_error(other),
            })?;

        info!("Appointment {} updated by {}", appointment.id, actor.id);

        self.load_details(appointment, auth_token).await
    }

    pub async fn get_appointment(
        &self,
        actor: &Actor,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<AppointmentDetails, AppError> {
        actor.require(capability::VIEW_APPOINTMENTS)?;
        let appointment = self
            .load_for_actor(actor, appointment_id, auth_token)
            .await?;
        self.load_details(appointment, auth_token).await
    }

    pub async fn list_appointments(
        &self,
        actor: &Actor,
        query: &AppointmentListQuery,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, AppError> {
        actor.require(capability::VIEW_APPOINTMENTS)?;

        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut filters = vec![
            "is_deleted=eq.false".to_string(),
            "order=date.desc,time_slot.asc".to_string(),
            format!("limit={}", limit),
            format!("offset={}", offset),
        ];

        // Doctors only ever see their own schedule.
        if actor.role == Role::Doctor {
            filters.push(format!("doctor_id=eq.{}", actor.id));
        } else if let Some(doctor_id) = &query.doctor_id {
            filters.push(format!("doctor_id=eq.{}", doctor_id));
        }

        if let Some(patient_id) = &query.patient_id {
            filters.push(format!("patient_id=eq.{}", patient_id));
        }
        if let Some(status) = &query.status {
            filters.push(format!("status=eq.{}", status));
        }
        if let Some(from_date) = &query.from_date {
            filters.push(format!("date=gte.{}", from_date));
        }
        if let Some(to_date) = &query.to_date {
            filters.push(format!("date=lte.{}", to_date));
        }

        self.store
            .find("appointments", &filters, Some(auth_token))
            .await
            .map_err(map_store_error)
    }

    /// Load one appointment for the acting user. For doctors the ownership
    /// restriction is folded into the existence query, so a foreign
    /// appointment reads as absent.
    async fn load_for_actor(
        &self,
        actor: &Actor,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppError> {
        debug!("Loading appointment {} for {}", appointment_id, actor.id);

        let mut filters = vec![
            format!("id=eq.{}", appointment_id),
            "is_deleted=eq.false".to_string(),
        ];
        if actor.role == Role::Doctor {
            filters.push(format!("doctor_id=eq.{}", actor.id));
        }

        let appointment: Option<Appointment> = self
            .store
            .find_one("appointments", &filters, Some(auth_token))
            .await
            .map_err(map_store_error)?;

        appointment.ok_or_else(|| map_appointment_error(AppointmentError::NotFound))
    }

    async fn verify_patient_exists(
        &self,
        patient_id: &str,
        auth_token: &str,
    ) -> Result<(), AppError> {
        let row: Option<Value> = self
            .store
            .find_one(
                "patients",
                &[
                    format!("id=eq.{}", patient_id),
                    "is_deleted=eq.false".to_string(),
                    "select=id".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        row.map(|_| ())
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
    }

    async fn verify_doctor_exists(
        &self,
        doctor_id: &str,
        auth_token: &str,
    ) -> Result<(), AppError> {
        let row: Option<Value> = self
            .store
            .find_one(
                "doctors",
                &[
                    format!("id=eq.{}", doctor_id),
                    "is_deleted=eq.false".to_string(),
                    "select=id".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        row.map(|_| ())
            .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
    }

    /// Attach denormalized patient/doctor summaries. A missing reference is
    /// tolerated on read and simply left empty.
    async fn load_details(
        &self,
        appointment: Appointment,
        auth_token: &str,
    ) -> Result<AppointmentDetails, AppError> {
        let patient: Option<PatientSummary> = self
            .store
            .find_one(
                "patients",
                &[
                    format!("id=eq.{}", appointment.patient_id),
                    "select=id,name,email,phone".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        let doctor: Option<DoctorSummary> = self
            .store
            .find_one(
                "doctors",
                &[
                    format!("id=eq.{}", appointment.doctor_id),
                    "select=id,name,email,department,specialization".to_string(),
                ],
                Some(auth_token),
            )
            .await
            .map_err(map_store_error)?;

        Ok(AppointmentDetails {
            appointment,
            patient,
            doctor,
        })
    }
}

fn map_appointment_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::SlotTaken => AppError::Conflict(
            "This time slot is already booked for the selected doctor".to_string(),
        ),
        AppointmentError::PastDate => {
            AppError::PastDate("Appointment date cannot be in the past".to_string())
        }
        AppointmentError::InvalidStatusTransition { from, to } => AppError::Validation {
            field: "status".to_string(),
            reason: format!("cannot transition from {} to {}", from, to),
        },
        AppointmentError::Database(msg) => AppError::Database(msg),
    }
}
