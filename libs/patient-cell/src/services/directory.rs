use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_database::error::StoreError;
use shared_database::store::DocumentStore;
use shared_models::actor::Actor;
use shared_models::error::AppError;
use shared_utils::audit;
use shared_utils::password::hash_password;
use shared_utils::store::map_store_error;
use shared_utils::validate;

use crate::models::{
    CreatePatientRequest, Patient, PatientListQuery, UpdatePatientRequest, DEFAULT_AVATAR_URL,
    PATIENT_STATUSES,
};

pub struct PatientDirectoryService {
    store: Arc<DocumentStore>,
}

impl PatientDirectoryService {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreatePatientRequest,
        token: &str,
    ) -> Result<Patient, AppError> {
        validate::require_str("name", &request.name)?;
        validate::validate_email("email", &request.email)?;
        validate::validate_phone("phone", &request.phone)?;
        if request.password.len() < 8 {
            return Err(AppError::Validation {
                field: "password".to_string(),
                reason: "must be at least 8 characters".to_string(),
            });
        }

        let email = request.email.trim().to_lowercase();
        self.reject_duplicate_email(&email, None, token).await?;

        let mut body = json!({
            "id": Uuid::new_v4().to_string(),
            "name": request.name.trim(),
            "email": email,
            "phone": request.phone,
            "password_hash": hash_password(&request.password)?,
            "gender": request.gender,
            "blood_group": request.blood_group,
            "address": request.address,
            "avatar_url": request.avatar_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
            "status": "active",
            "is_deleted": false,
        });
        audit::apply_stamp(&mut body, audit::creation_stamp(actor));

        let patient: Patient = self
            .store
            .insert("patients", body, Some(token))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    AppError::Conflict("A patient with this email already exists".to_string())
                }
                other => map_store_error(other),
            })?;

        info!("Patient {} created by {}", patient.id, actor.id);
        Ok(patient)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        patient_id: &str,
        request: UpdatePatientRequest,
        token: &str,
    ) -> Result<Patient, AppError> {
        let existing = self
            .get(patient_id, token)
            .await?
            .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

        let mut patch = json!({});
        if let Some(name) = &request.name {
            validate::require_str("name", name)?;
            patch["name"] = json!(name.trim());
        }
        if let Some(email) = &request.email {
            validate::validate_email("email", email)?;
            let email = email.trim().to_lowercase();
            if email != existing.email {
                self.reject_duplicate_email(&email, Some(patient_id), token)
                    .await?;
            }
            patch["email"] = json!(email);
        }
        if let Some(phone) = &request.phone {
            validate::validate_phone("phone", phone)?;
            patch["phone"] = json!(phone);
        }
        if let Some(status) = &request.status {
            validate::validate_enum("status", status, PATIENT_STATUSES)?;
            patch["status"] = json!(status);
        }
        if let Some(gender) = &request.gender {
            patch["gender"] = json!(gender);
        }
        if let Some(blood_group) = &request.blood_group {
            patch["blood_group"] = json!(blood_group);
        }
        if let Some(address) = &request.address {
            patch["address"] = json!(address);
        }
        if let Some(avatar_url) = &request.avatar_url {
            validate::require_str("avatar_url", avatar_url)?;
            patch["avatar_url"] = json!(avatar_url);
        }

        audit::apply_stamp(&mut patch, audit::update_stamp(actor));

        let patient: Patient = self
            .store
            .update_by_id("patients", patient_id, patch, Some(token))
            .await
            .map_err(map_store_error)?;

        info!("Patient {} updated by {}", patient.id, actor.id);
        Ok(patient)
    }

    pub async fn get(&self, patient_id: &str, token: &str) -> Result<Option<Patient>, AppError> {
        debug!("Loading patient {}", patient_id);
        self.store
            .find_one(
                "patients",
                &[
                    format!("id=eq.{}", patient_id),
                    "is_deleted=eq.false".to_string(),
                ],
                Some(token),
            )
            .await
            .map_err(map_store_error)
    }

    pub async fn list(
        &self,
        query: &PatientListQuery,
        token: &str,
    ) -> Result<Vec<Patient>, AppError> {
        let limit = query.limit.unwrap_or(20).clamp(1, 100);
        let page = query.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut filters = vec![
            "is_deleted=eq.false".to_string(),
            "order=created_at.desc".to_string(),
            format!("limit={}", limit),
            format!("offset={}", offset),
        ];

        if let Some(status) = &query.status {
            filters.push(format!("status=eq.{}", status));
        }
        if let Some(search) = &query.search {
            let pattern = urlencoding::encode(search.trim()).into_owned();
            filters.push(format!(
                "or=(name.ilike.*{}*,email.ilike.*{}*)",
                pattern, pattern
            ));
        }

        self.store
            .find("patients", &filters, Some(token))
            .await
            .map_err(map_store_error)
    }

    async fn reject_duplicate_email(
        &self,
        email: &str,
        exclude_id: Option<&str>,
        token: &str,
    ) -> Result<(), AppError> {
        let mut filters = vec![
            format!("email=eq.{}", urlencoding::encode(email)),
            "is_deleted=eq.false".to_string(),
            "select=id".to_string(),
        ];
        if let Some(id) = exclude_id {
            filters.push(format!("id=neq.{}", id));
        }

        let existing: Option<Value> = self
            .store
            .find_one("patients", &filters, Some(token))
            .await
            .map_err(map_store_error)?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "A patient with this email already exists".to_string(),
            ));
        }
        Ok(())
    }
}
